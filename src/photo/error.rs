//! Error types for photo staging.

use thiserror::Error;

/// Reasons a photo selection is refused.
///
/// All of these are user-correctable: pick a different file and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    /// Declared media type is not an image
    #[error("Please select a valid image file ('{name}' is {media_type})")]
    NotAnImage {
        /// File name as reported by the picker
        name: String,
        /// Declared media type (may be empty)
        media_type: String,
    },

    /// File exceeds the size limit
    #[error("File size must be less than 5MB ('{name}' is {size} bytes, limit {limit})")]
    TooLarge {
        /// File name as reported by the picker
        name: String,
        /// File size in bytes
        size: u64,
        /// Size limit in bytes
        limit: u64,
    },

    /// Selection would exceed the photo count limit
    #[error("At most {limit} photos can be attached")]
    TooMany {
        /// Maximum number of staged photos
        limit: usize,
    },

    /// Platform could not create a preview
    #[error("Could not create a preview for '{name}': {message}")]
    Preview {
        /// File name as reported by the picker
        name: String,
        /// Platform error description
        message: String,
    },
}

impl StagingError {
    /// Create a preview error.
    pub fn preview(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Preview {
            name: name.into(),
            message: message.into(),
        }
    }
}
