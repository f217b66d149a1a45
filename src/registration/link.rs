//! Chat hand-off message and deep link.
//!
//! The deep link is how an order is actually delivered: it opens a chat with
//! the shop operator, pre-filled with the registration summary. Nothing else
//! transmits the order anywhere.

use super::RegistrationDetails;
use crate::constants::{DEFAULT_HANDOFF_DESTINATION, DEFAULT_MESSAGING_HOST, MISSING_PRODUCT_NAME};

/// Messaging service and destination address for the hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffTarget {
    host: String,
    destination: String,
}

impl HandoffTarget {
    /// Create a target. A leading '+' on the destination is dropped.
    pub fn new(host: &str, destination: &str) -> Self {
        Self {
            host: host.trim().trim_end_matches('/').to_string(),
            destination: destination.trim().trim_start_matches('+').to_string(),
        }
    }

    /// Messaging host (e.g. "wa.me").
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Destination address, digits only.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Deep link that opens a chat pre-filled with `message`.
    pub fn deep_link(&self, message: &str) -> String {
        format!(
            "https://{}/{}?text={}",
            self.host,
            self.destination,
            urlencoding::encode(message)
        )
    }
}

impl Default for HandoffTarget {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGING_HOST, DEFAULT_HANDOFF_DESTINATION)
    }
}

/// Human-readable summary sent to the operator.
pub fn summary_message(details: &RegistrationDetails, product_name: Option<&str>) -> String {
    format!(
        "Hello, I just registered for the product: {}.\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Location: {}\n\
         Quantity: {}",
        product_name.unwrap_or(MISSING_PRODUCT_NAME),
        details.name,
        details.email,
        details.phone,
        details.location,
        details.quantity
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> RegistrationDetails {
        RegistrationDetails {
            name: "Alex".to_string(),
            email: "a@x.com".to_string(),
            phone: "5551234".to_string(),
            location: "Cairo".to_string(),
            quantity: 2,
        }
    }

    #[test]
    fn test_summary_lists_every_field() {
        let message = summary_message(&details(), Some("Lamp"));
        assert_eq!(
            message,
            "Hello, I just registered for the product: Lamp.\n\
             Name: Alex\n\
             Email: a@x.com\n\
             Phone: 5551234\n\
             Location: Cairo\n\
             Quantity: 2"
        );
    }

    #[test]
    fn test_summary_without_product() {
        let message = summary_message(&details(), None);
        assert!(message.starts_with("Hello, I just registered for the product: N/A."));
    }

    #[test]
    fn test_deep_link_encodes_message() {
        let target = HandoffTarget::new("wa.me", "+201126811159");
        assert_eq!(target.destination(), "201126811159");

        let link = target.deep_link("Hi & bye\nQuantity: 2");
        assert_eq!(
            link,
            "https://wa.me/201126811159?text=Hi%20%26%20bye%0AQuantity%3A%202"
        );
    }

    #[test]
    fn test_default_target() {
        let target = HandoffTarget::default();
        assert_eq!(target.host(), "wa.me");
        assert!(target.deep_link("x").starts_with("https://wa.me/201126811159?text="));
    }
}
