//! Storefront client core.
//!
//! The logic behind a small storefront web client: catalog browsing, a product
//! handoff between views, a registration form that ends in a chat deep link,
//! photo staging for new listings, a tab-scoped customer photo gallery, and the
//! REST client the views talk to.
//!
//! Browser-specific adapters (`sessionStorage`, object URLs, `window.open`) are
//! compiled only for `wasm32`; everything else runs and is tested natively.

pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod gallery;
pub mod handoff;
pub mod listing;
pub mod logging;
pub mod model;
pub mod notice;
pub mod photo;
pub mod registration;
pub mod storage;

#[cfg(test)]
mod tests;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
