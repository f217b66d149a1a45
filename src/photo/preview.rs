//! Preview handles for staged photos.
//!
//! A preview is a transient display reference (an object URL in the browser).
//! Each one is a resource: acquired when a photo is staged and released when
//! it is discarded. [`PreviewHandle`] is not `Clone`: releasing consumes it.

use std::cell::RefCell;
use std::rc::Rc;

use super::{PhotoFile, StagingError};

/// A live preview reference.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    url: String,
}

impl PreviewHandle {
    /// Wrap a platform preview URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// URL usable as an image source while the handle is live.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Creates and releases preview handles for a kind of file source.
pub trait PreviewProvider {
    /// Platform file representation (browser `File`, raw bytes natively)
    type Source;

    /// Create a preview for a photo about to be staged.
    fn acquire(&mut self, file: &PhotoFile<Self::Source>) -> Result<PreviewHandle, StagingError>;

    /// Release a preview. Consumes the handle.
    fn release(&mut self, handle: PreviewHandle);
}

/// Acquisition and release counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewStats {
    /// Handles created
    pub acquired: usize,
    /// Handles released
    pub released: usize,
}

impl PreviewStats {
    /// Handles still live.
    pub fn live(&self) -> usize {
        self.acquired - self.released
    }
}

/// In-memory previews over raw bytes.
///
/// Clones share counters, so a test can keep one clone and inspect it after
/// the stager holding the other has been dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreviews {
    stats: Rc<RefCell<PreviewStats>>,
}

impl MemoryPreviews {
    /// Create a provider with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn stats(&self) -> PreviewStats {
        *self.stats.borrow()
    }
}

impl PreviewProvider for MemoryPreviews {
    type Source = Vec<u8>;

    fn acquire(&mut self, file: &PhotoFile<Vec<u8>>) -> Result<PreviewHandle, StagingError> {
        let mut stats = self.stats.borrow_mut();
        stats.acquired += 1;
        Ok(PreviewHandle::new(format!(
            "memory:preview/{}/{}",
            stats.acquired, file.name
        )))
    }

    fn release(&mut self, handle: PreviewHandle) {
        self.stats.borrow_mut().released += 1;
        log::trace!("Released preview {}", handle.url());
    }
}

/// Object URL previews over browser files (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct ObjectUrlPreviews;

#[cfg(target_arch = "wasm32")]
impl PreviewProvider for ObjectUrlPreviews {
    type Source = web_sys::File;

    fn acquire(&mut self, file: &PhotoFile<web_sys::File>) -> Result<PreviewHandle, StagingError> {
        web_sys::Url::create_object_url_with_blob(&file.source)
            .map(PreviewHandle::new)
            .map_err(|e| StagingError::preview(&file.name, format!("{:?}", e)))
    }

    fn release(&mut self, handle: PreviewHandle) {
        if let Err(e) = web_sys::Url::revoke_object_url(handle.url()) {
            log::warn!("Failed to revoke preview {}: {:?}", handle.url(), e);
        }
    }
}
