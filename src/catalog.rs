//! Product list state.
//!
//! Holds the products and categories last fetched from the API, applies the
//! search box filter, and writes the clicked product into the handoff store
//! before the registration view takes over.

use crate::handoff::{HandoffStore, StoreError};
use crate::model::{Category, Product};
use crate::storage::TabStorage;

/// Which products to request from the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every product
    #[default]
    All,
    /// Products of the category with this slug
    Slug(String),
}

/// Product list view state.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    search: String,
    filter: CategoryFilter,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the product list with a fresh API result.
    pub fn set_products(&mut self, products: Vec<Product>) {
        log::debug!("Catalog loaded {} products", products.len());
        self.products = products;
    }

    /// Replace the category list with a fresh API result.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    /// Update the search box text.
    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
    }

    /// Change the category filter. The caller refetches products afterwards.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Active category filter.
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Products whose name or category name contains the search text.
    pub fn visible_products(&self) -> Vec<&Product> {
        let needle = self.search.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.category
                        .as_ref()
                        .is_some_and(|c| c.name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Categories whose name contains the search text.
    pub fn visible_categories(&self) -> Vec<&Category> {
        let needle = self.search.trim().to_lowercase();
        self.categories
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Find a loaded product by id.
    pub fn product(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Record the clicked product for the registration view.
    ///
    /// Returns false if no loaded product has this id.
    pub fn select<S: TabStorage>(&self, id: u64, store: &HandoffStore<S>) -> Result<bool, StoreError> {
        let Some(product) = self.product(id) else {
            log::warn!("Selected unknown product {}", id);
            return Ok(false);
        };
        store.set_selected_product(product)?;
        Ok(true)
    }
}
