//! Error types for the REST collaborator.

use thiserror::Error;

use crate::storage::StorageError;

/// Banner shown for any failed API call.
pub const GENERIC_FAILURE_NOTICE: &str = "Something went wrong. Please try again.";

/// A failed API call.
///
/// Callers only distinguish success from failure; the variants exist for
/// logging.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Base URL or endpoint path could not be parsed
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Transport-level failure (DNS, TLS, connection reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Unexpected API response: {0}")]
    Decode(String),

    /// Auth token could not be read or persisted
    #[error("Token storage error: {0}")]
    Token(#[from] StorageError),
}

impl ApiError {
    /// Text safe to show to the user.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_NOTICE
    }

    /// Check if the server rejected the credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}
