//! REST API collaborator.
//!
//! A thin request/response layer over the storefront backend. The rest of the
//! crate only cares whether a call succeeded; failures surface as a generic
//! banner and are never retried automatically.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront::api::{ApiClient, AuthScheme};
//!
//! let client = ApiClient::new(&config.api_base_url, AuthScheme::Token, token_storage)?;
//! let products = client.products().await?;
//! ```

mod client;
mod error;
mod images;

pub use client::{ApiClient, AuthScheme, Credentials, NewAccount, NewProduct, UploadPhoto};
pub use error::{ApiError, GENERIC_FAILURE_NOTICE};
pub use images::{PLACEHOLDER_IMAGE, is_absolute, media_base, resolve_image_url};
