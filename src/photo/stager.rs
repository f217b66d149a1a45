//! In-memory set of staged photos with their previews.

use super::{PhotoFile, PreviewHandle, PreviewProvider, StagingError};
use crate::constants::MAX_PHOTO_BYTES;

/// Limits applied to every selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingLimits {
    /// Largest accepted file, in bytes
    pub max_bytes: u64,
    /// Largest number of staged photos (`None` for unlimited)
    pub max_photos: Option<usize>,
}

impl Default for StagingLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_PHOTO_BYTES,
            max_photos: None,
        }
    }
}

/// A validated photo with a live preview.
#[derive(Debug)]
pub struct StagedPhoto<B> {
    file: PhotoFile<B>,
    preview: PreviewHandle,
}

impl<B> StagedPhoto<B> {
    /// The staged file.
    pub fn file(&self) -> &PhotoFile<B> {
        &self.file
    }

    /// File name.
    pub fn name(&self) -> &str {
        &self.file.name
    }

    /// Declared media type.
    pub fn media_type(&self) -> &str {
        &self.file.media_type
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.file.size
    }

    /// Preview URL, valid until the photo is unstaged.
    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

/// Staged photos for one form.
///
/// Every preview acquired by [`stage`](Self::stage) is released by
/// [`unstage`](Self::unstage), [`clear`](Self::clear),
/// [`take_all`](Self::take_all) or when the stager is dropped.
pub struct PhotoStager<P: PreviewProvider> {
    provider: P,
    limits: StagingLimits,
    staged: Vec<StagedPhoto<P::Source>>,
}

impl<P: PreviewProvider> PhotoStager<P> {
    /// Create an empty stager with default limits.
    pub fn new(provider: P) -> Self {
        Self::with_limits(provider, StagingLimits::default())
    }

    /// Create an empty stager with custom limits.
    pub fn with_limits(provider: P, limits: StagingLimits) -> Self {
        Self {
            provider,
            limits,
            staged: Vec::new(),
        }
    }

    /// Active limits.
    pub fn limits(&self) -> StagingLimits {
        self.limits
    }

    /// Validate and stage a selection.
    ///
    /// The whole selection is checked before anything is staged: if any file
    /// is rejected the staged set is left unchanged. On success the newly
    /// staged photos are returned. An empty selection stages nothing.
    pub fn stage(
        &mut self,
        files: Vec<PhotoFile<P::Source>>,
    ) -> Result<&[StagedPhoto<P::Source>], StagingError> {
        let start = self.staged.len();
        if files.is_empty() {
            return Ok(&self.staged[start..]);
        }

        for file in &files {
            self.check(file)?;
        }
        if let Some(limit) = self.limits.max_photos {
            if start + files.len() > limit {
                log::warn!(
                    "Rejected {} photo(s): {} already staged, limit {}",
                    files.len(),
                    start,
                    limit
                );
                return Err(StagingError::TooMany { limit });
            }
        }

        let mut accepted = Vec::with_capacity(files.len());
        for file in files {
            match self.provider.acquire(&file) {
                Ok(preview) => accepted.push(StagedPhoto { file, preview }),
                Err(e) => {
                    // Roll back previews acquired for this selection
                    for photo in accepted {
                        self.provider.release(photo.preview);
                    }
                    return Err(e);
                }
            }
        }

        log::debug!("Staged {} photo(s)", accepted.len());
        self.staged.extend(accepted);
        Ok(&self.staged[start..])
    }

    /// Check one file against the type and size rules without staging it.
    pub fn check(&self, file: &PhotoFile<P::Source>) -> Result<(), StagingError> {
        if !file.is_image() {
            log::warn!("Rejected '{}': media type '{}'", file.name, file.media_type);
            return Err(StagingError::NotAnImage {
                name: file.name.clone(),
                media_type: file.media_type.clone(),
            });
        }
        if file.size > self.limits.max_bytes {
            log::warn!("Rejected '{}': {} bytes", file.name, file.size);
            return Err(StagingError::TooLarge {
                name: file.name.clone(),
                size: file.size,
                limit: self.limits.max_bytes,
            });
        }
        Ok(())
    }

    /// Remove the photo at `index` and release its preview.
    ///
    /// Returns the removed file, or `None` if `index` is out of range.
    pub fn unstage(&mut self, index: usize) -> Option<PhotoFile<P::Source>> {
        if index >= self.staged.len() {
            return None;
        }
        let photo = self.staged.remove(index);
        self.provider.release(photo.preview);
        log::debug!("Unstaged '{}'", photo.file.name);
        Some(photo.file)
    }

    /// Currently staged photos, in staging order.
    pub fn staged(&self) -> &[StagedPhoto<P::Source>] {
        &self.staged
    }

    /// Number of staged photos.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Check if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Preview URLs of every staged photo.
    pub fn preview_urls(&self) -> Vec<&str> {
        self.staged.iter().map(|p| p.preview_url()).collect()
    }

    /// Release every preview and hand the files over, in staging order.
    pub fn take_all(&mut self) -> Vec<PhotoFile<P::Source>> {
        let staged = std::mem::take(&mut self.staged);
        staged
            .into_iter()
            .map(|photo| {
                self.provider.release(photo.preview);
                photo.file
            })
            .collect()
    }

    /// Drop every staged photo, releasing previews.
    pub fn clear(&mut self) {
        let count = self.take_all().len();
        if count > 0 {
            log::debug!("Cleared {} staged photo(s)", count);
        }
    }

    /// Access the preview provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: PreviewProvider> Drop for PhotoStager<P> {
    fn drop(&mut self) {
        self.clear();
    }
}
