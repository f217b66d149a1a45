//! Data models for the storefront client.

mod category;
mod product;
mod registration;

pub use category::Category;
pub use product::{Product, ProductImage};
pub use registration::RegistrationRecord;
