//! Photo staging.
//!
//! Validates photos picked from the native file picker, keeps them in memory
//! with a preview each, and hands them to the form that owns the stager.
//! Nothing here touches the network or persistent storage.

mod error;
mod preview;
mod stager;

pub use error::StagingError;
#[cfg(target_arch = "wasm32")]
pub use preview::ObjectUrlPreviews;
pub use preview::{MemoryPreviews, PreviewHandle, PreviewProvider, PreviewStats};
pub use stager::{PhotoStager, StagedPhoto, StagingLimits};

use crate::constants::IMAGE_MEDIA_PREFIX;

/// A file picked by the user, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile<B> {
    /// File name as reported by the picker
    pub name: String,
    /// Declared media type (e.g. "image/png"), possibly empty
    pub media_type: String,
    /// Size in bytes
    pub size: u64,
    /// Platform file data
    pub source: B,
}

impl<B> PhotoFile<B> {
    /// Describe a file whose size is known up front.
    pub fn with_size(name: &str, media_type: &str, size: u64, source: B) -> Self {
        Self {
            name: name.to_string(),
            media_type: media_type.to_string(),
            size,
            source,
        }
    }

    /// Check if the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        self.media_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(IMAGE_MEDIA_PREFIX)
    }
}

impl PhotoFile<Vec<u8>> {
    /// Describe an in-memory file; the size is the byte length.
    pub fn new(name: &str, media_type: &str, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::with_size(name, media_type, size, bytes)
    }
}

/// Collect the files of a browser `FileList` (WASM only).
#[cfg(target_arch = "wasm32")]
pub fn files_from_list(list: &web_sys::FileList) -> Vec<PhotoFile<web_sys::File>> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|file| {
            let name = file.name();
            let media_type = file.type_();
            let size = file.size() as u64;
            PhotoFile::with_size(&name, &media_type, size, file)
        })
        .collect()
}
