//! Registration record data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// A validated registration, as appended to the handoff log.
///
/// Records are append-only: once logged they are never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: String,
    /// Customer phone number
    #[serde(rename = "phonenumber")]
    pub phone: String,
    /// Delivery location
    pub location: String,
    /// Number of items requested (always > 0)
    pub quantity: u32,
    /// Product snapshot at submission time
    pub product: Option<Product>,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl RegistrationRecord {
    /// Name of the registered product, if one was selected.
    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}
