//! Global constants for the storefront client

/// Largest photo the staging component accepts (5 MiB)
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Media type prefix every staged photo must carry
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Tab storage key holding the currently selected product
pub const SELECTED_PRODUCT_KEY: &str = "selectedProduct";

/// Tab storage key holding the registration log
pub const REGISTRATIONS_KEY: &str = "registrations";

/// Tab storage key holding the customer photo gallery
pub const CUSTOMER_PHOTOS_KEY: &str = "customerPhotos";

/// Persistent storage key holding the API auth token
pub const TOKEN_KEY: &str = "token";

/// Default REST API base (trailing slash matters for relative joins)
pub const DEFAULT_API_BASE_URL: &str = "https://ecommerce-fullstack-django.up.railway.app/api/";

/// Default messaging service host for the checkout hand-off
pub const DEFAULT_MESSAGING_HOST: &str = "wa.me";

/// Default chat destination (country code included, no leading '+')
pub const DEFAULT_HANDOFF_DESTINATION: &str = "201126811159";

/// Default lifetime of a transient banner, in milliseconds
pub const DEFAULT_NOTICE_MILLIS: u64 = 3_000;

/// Shortest allowed banner lifetime, in milliseconds
pub const MIN_NOTICE_MILLIS: u64 = 3_000;

/// Longest allowed banner lifetime, in milliseconds
pub const MAX_NOTICE_MILLIS: u64 = 5_000;

/// Shown in place of a product name when no product was selected
pub const MISSING_PRODUCT_NAME: &str = "N/A";

/// Shown in place of a category name when the product has none
pub const UNCATEGORIZED: &str = "Uncategorized";
