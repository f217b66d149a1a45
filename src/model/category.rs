//! Product category data model.

use serde::{Deserialize, Serialize};

/// A product category as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier for the category
    pub id: u32,
    /// Display name of the category
    pub name: String,
    /// URL-safe name used by the by-category product listing
    #[serde(default)]
    pub slug: String,
}

impl Category {
    /// Create a new category with the given ID and name.
    ///
    /// The slug is derived from the name (lowercase, spaces as dashes).
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: name.trim().to_lowercase().replace(' ', "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_name() {
        let category = Category::new(3, "Home Decor");
        assert_eq!(category.slug, "home-decor");
    }

    #[test]
    fn test_slug_defaults_when_missing() {
        let category: Category = serde_json::from_str(r#"{"id": 1, "name": "Toys"}"#).unwrap();
        assert_eq!(category.slug, "");
    }
}
