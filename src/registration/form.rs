//! Registration form fields and validation.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Product, RegistrationRecord};

/// A user-editable registration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Customer name
    Name,
    /// Customer email
    Email,
    /// Customer phone number
    Phone,
    /// Delivery location
    Location,
    /// Number of items
    Quantity,
}

impl Field {
    /// Form key of this field, as used by the registration view.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phonenumber",
            Field::Location => "location",
            Field::Quantity => "quantity",
        }
    }

    /// Look a field up by its form key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.key() == key)
    }

    /// All fields in display order.
    pub fn all() -> &'static [Field] {
        &[
            Field::Name,
            Field::Email,
            Field::Phone,
            Field::Location,
            Field::Quantity,
        ]
    }
}

/// A per-field validation failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is blank
    #[error("Please Enter Your Name")]
    MissingName,
    /// Email is blank
    #[error("Please Enter Your Email")]
    MissingEmail,
    /// Phone number is blank
    #[error("Please Enter Your Phone Number")]
    MissingPhone,
    /// Location is blank
    #[error("Please Enter Your Location")]
    MissingLocation,
    /// Quantity is missing, not a whole number, or not positive
    #[error("Please Enter a Valid Number of Items")]
    InvalidQuantity,
}

impl ValidationError {
    /// The field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingName => Field::Name,
            ValidationError::MissingEmail => Field::Email,
            ValidationError::MissingPhone => Field::Phone,
            ValidationError::MissingLocation => Field::Location,
            ValidationError::InvalidQuantity => Field::Quantity,
        }
    }
}

/// Every failure found in one validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Error for `field`, if it failed.
    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    /// All errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if every field passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: String,
    /// Customer phone number
    pub phone: String,
    /// Delivery location
    pub location: String,
    /// Number of items, unparsed
    pub quantity: String,
}

impl RegistrationForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Location => &self.location,
            Field::Quantity => &self.quantity,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Location => &mut self.location,
            Field::Quantity => &mut self.quantity,
        };
        *slot = value.into();
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validate every field.
    ///
    /// All rules run regardless of earlier failures, so the caller can show
    /// every problem at once.
    pub fn validate(&self) -> Result<RegistrationDetails, ValidationErrors> {
        let mut errors = Vec::new();

        if is_blank(&self.name) {
            errors.push(ValidationError::MissingName);
        }
        if is_blank(&self.email) {
            errors.push(ValidationError::MissingEmail);
        }
        if is_blank(&self.phone) {
            errors.push(ValidationError::MissingPhone);
        }
        if is_blank(&self.location) {
            errors.push(ValidationError::MissingLocation);
        }
        let quantity = parse_quantity(&self.quantity);
        if quantity.is_none() {
            errors.push(ValidationError::InvalidQuantity);
        }

        match quantity {
            Some(quantity) if errors.is_empty() => Ok(RegistrationDetails {
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                phone: self.phone.trim().to_string(),
                location: self.location.trim().to_string(),
                quantity,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A strictly positive whole number, digits only.
fn parse_quantity(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u32>().ok().filter(|&q| q > 0)
}

/// Validated, trimmed registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: String,
    /// Customer phone number
    pub phone: String,
    /// Delivery location
    pub location: String,
    /// Number of items (> 0)
    pub quantity: u32,
}

impl RegistrationDetails {
    /// Merge with the product snapshot into a log record.
    pub fn into_record(self, product: Option<Product>, timestamp: DateTime<Utc>) -> RegistrationRecord {
        RegistrationRecord {
            name: self.name,
            email: self.email,
            phone: self.phone,
            location: self.location,
            quantity: self.quantity,
            product,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegistrationForm {
        RegistrationForm {
            name: "Alex".to_string(),
            email: "a@x.com".to_string(),
            phone: "5551234".to_string(),
            location: "Cairo".to_string(),
            quantity: "2".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let details = filled().validate().unwrap();
        assert_eq!(details.name, "Alex");
        assert_eq!(details.quantity, 2);
    }

    #[test]
    fn test_values_trimmed() {
        let mut form = filled();
        form.set(Field::Name, "  Alex ");
        form.set(Field::Quantity, " 3 ");
        let details = form.validate().unwrap();
        assert_eq!(details.name, "Alex");
        assert_eq!(details.quantity, 3);
    }

    #[test]
    fn test_all_errors_reported() {
        let errors = RegistrationForm::new().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        for field in Field::all() {
            assert!(errors.for_field(*field).is_some(), "missing {:?}", field);
        }
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let mut form = filled();
        form.set(Field::Name, "   ");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field(Field::Name),
            Some(&ValidationError::MissingName)
        );
    }

    #[test]
    fn test_bad_quantities() {
        for quantity in ["0", "-2", "+2", "", "two", "1.5", "1e2", "99999999999"] {
            let mut form = filled();
            form.set(Field::Quantity, quantity);
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.len(), 1, "quantity {:?}", quantity);
            assert_eq!(
                errors.for_field(Field::Quantity),
                Some(&ValidationError::InvalidQuantity)
            );
        }
    }

    #[test]
    fn test_error_messages() {
        let mut form = filled();
        form.set(Field::Email, "");
        form.set(Field::Quantity, "0");
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Please Enter Your Email; Please Enter a Valid Number of Items"
        );
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::from_key("phonenumber"), Some(Field::Phone));
        assert_eq!(Field::from_key("nope"), None);
    }

    #[test]
    fn test_clear() {
        let mut form = filled();
        form.clear();
        assert_eq!(form, RegistrationForm::new());
    }
}
