//! Product data model, as served by the catalog API.

use serde::{Deserialize, Deserializer, Serialize};

use super::Category;
use crate::constants::UNCATEGORIZED;

/// An additional product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image record identifier
    #[serde(default)]
    pub id: u64,
    /// Image reference (absolute URL or server-relative path)
    pub image: String,
}

/// A product snapshot.
///
/// Products are read-only on the client. Once selected for a registration the
/// snapshot is carried verbatim through the handoff store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Unit price
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    /// Owning category, if any
    #[serde(default)]
    pub category: Option<Category>,
    /// Primary image reference
    #[serde(default)]
    pub image: Option<String>,
    /// Additional images
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Units in stock
    #[serde(default)]
    pub stock_quantity: u32,
}

impl Product {
    /// Create a product with a name and price and every other field empty.
    pub fn new(id: u64, name: &str, price: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            category: None,
            image: None,
            images: Vec::new(),
            stock_quantity: 0,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the primary image reference.
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }

    /// Category name for display.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Every image reference, primary first.
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        self.image
            .as_deref()
            .into_iter()
            .chain(self.images.iter().map(|i| i.image.as_str()))
    }
}

/// The API serializes decimals as strings ("19.99"); older payloads and local
/// snapshots carry plain numbers. Accept both.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    let price = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => n,
        RawPrice::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid price '{s}': {e}")))?,
    };
    // JSON has no NaN or infinity; such a price would not survive a store roundtrip
    if !price.is_finite() {
        return Err(serde::de::Error::custom(format!("invalid price '{price}'")));
    }
    Ok(price)
}
