//! Seller product listing form.
//!
//! Collects a new product's fields and photos, validates them, and turns them
//! into a multipart creation request. The first staged photo becomes the
//! primary image; any others are sent as additional images.

use std::fmt;

use thiserror::Error;

use crate::api::{ApiClient, ApiError, NewProduct, UploadPhoto};
use crate::model::Product;
use crate::notice::NoticeBoard;
use crate::photo::{PhotoFile, PhotoStager, PreviewProvider};
use crate::storage::TabStorage;

/// Banner shown after the product was created.
pub const LISTING_SUCCESS_NOTICE: &str = "Product added successfully!";

/// Banner shown when creation failed, whatever the cause.
pub const LISTING_FAILURE_NOTICE: &str = "Failed to add product. Make sure you're logged in.";

/// A per-field listing validation failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFieldError {
    /// Name is blank
    #[error("Please enter a name")]
    MissingName,
    /// Description is blank
    #[error("Please enter a description")]
    MissingDescription,
    /// Price is missing, not a number, or not positive
    #[error("Please enter a valid price")]
    InvalidPrice,
    /// Stock is not a whole number
    #[error("Please enter a valid stock quantity")]
    InvalidStock,
    /// No category chosen
    #[error("Please select a category")]
    MissingCategory,
    /// No photo staged
    #[error("Please upload a photo")]
    MissingPhoto,
}

/// Every listing failure found in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingErrors(Vec<ListingFieldError>);

impl ListingErrors {
    /// Check if `error` was reported.
    pub fn contains(&self, error: ListingFieldError) -> bool {
        self.0.contains(&error)
    }

    /// All errors.
    pub fn iter(&self) -> impl Iterator<Item = &ListingFieldError> {
        self.0.iter()
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ListingErrors {
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

impl std::error::Error for ListingErrors {}

/// Why a listing was not created.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Form failed validation
    #[error("Invalid listing: {0}")]
    Invalid(ListingErrors),

    /// API call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Validated listing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price (> 0)
    pub price: f64,
    /// Units in stock
    pub stock_quantity: u32,
    /// Category identifier
    pub category_id: u32,
}

impl ListingDetails {
    /// Attach photos (primary first) to build the creation request.
    pub fn into_new_product(self, photos: Vec<UploadPhoto>) -> NewProduct {
        let mut photos = photos.into_iter();
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock_quantity: self.stock_quantity,
            category_id: self.category_id,
            image: photos.next(),
            images: photos.collect(),
        }
    }
}

impl From<&PhotoFile<Vec<u8>>> for UploadPhoto {
    fn from(file: &PhotoFile<Vec<u8>>) -> Self {
        Self {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            bytes: file.source.clone(),
        }
    }
}

/// The seller's "add item" form.
pub struct ListingForm<P: PreviewProvider> {
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price, unparsed
    pub price: String,
    /// Units in stock, unparsed
    pub stock_quantity: String,
    /// Chosen category
    pub category_id: Option<u32>,
    photos: PhotoStager<P>,
    errors: ListingErrors,
    notices: NoticeBoard,
}

impl<P: PreviewProvider> ListingForm<P> {
    /// Create an empty form around a photo stager.
    pub fn new(photos: PhotoStager<P>) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            stock_quantity: "1".to_string(),
            category_id: None,
            photos,
            errors: ListingErrors::default(),
            notices: NoticeBoard::default(),
        }
    }

    /// Staged photos.
    pub fn photos(&self) -> &PhotoStager<P> {
        &self.photos
    }

    /// Staged photos, for staging and unstaging.
    pub fn photos_mut(&mut self) -> &mut PhotoStager<P> {
        &mut self.photos
    }

    /// Errors from the last failed validation.
    pub fn errors(&self) -> &ListingErrors {
        &self.errors
    }

    /// Banner board.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Validate every field, recording the errors for display.
    pub fn validate(&mut self) -> Result<ListingDetails, ListingErrors> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ListingFieldError::MissingName);
        }
        if self.description.trim().is_empty() {
            errors.push(ListingFieldError::MissingDescription);
        }
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0);
        if price.is_none() {
            errors.push(ListingFieldError::InvalidPrice);
        }
        let stock = self.stock_quantity.trim().parse::<u32>().ok();
        if stock.is_none() {
            errors.push(ListingFieldError::InvalidStock);
        }
        if self.category_id.is_none() {
            errors.push(ListingFieldError::MissingCategory);
        }
        if self.photos.is_empty() {
            errors.push(ListingFieldError::MissingPhoto);
        }

        match (price, stock, self.category_id) {
            (Some(price), Some(stock_quantity), Some(category_id)) if errors.is_empty() => {
                self.errors = ListingErrors::default();
                Ok(ListingDetails {
                    name: self.name.trim().to_string(),
                    description: self.description.trim().to_string(),
                    price,
                    stock_quantity,
                    category_id,
                })
            }
            _ => {
                let errors = ListingErrors(errors);
                log::debug!("Listing invalid: {}", errors);
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Record the outcome of a creation request.
    ///
    /// Success clears the form and its photos; failure keeps everything so the
    /// seller can resubmit.
    pub fn finish(&mut self, outcome: &Result<Product, ApiError>) {
        match outcome {
            Ok(product) => {
                log::info!("Listed product {} ('{}')", product.id, product.name);
                self.notices.success(LISTING_SUCCESS_NOTICE);
                self.reset();
            }
            Err(e) => {
                log::warn!("Failed to add product: {}", e);
                self.notices.error(LISTING_FAILURE_NOTICE);
            }
        }
    }

    /// Clear every field and staged photo.
    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.price.clear();
        self.stock_quantity = "1".to_string();
        self.category_id = None;
        self.errors = ListingErrors::default();
        self.photos.clear();
    }
}

impl<P: PreviewProvider<Source = Vec<u8>>> ListingForm<P> {
    /// Validate and build the creation request without consuming the photos.
    pub fn prepare(&mut self) -> Result<NewProduct, ListingErrors> {
        let details = self.validate()?;
        let photos = self
            .photos
            .staged()
            .iter()
            .map(|p| UploadPhoto::from(p.file()))
            .collect();
        Ok(details.into_new_product(photos))
    }

    /// Validate, send and record the outcome.
    pub async fn submit<S: TabStorage>(&mut self, api: &ApiClient<S>) -> Result<Product, ListingError> {
        let request = self.prepare().map_err(ListingError::Invalid)?;
        let outcome = api.add_product(&request).await;
        self.finish(&outcome);
        Ok(outcome?)
    }
}
