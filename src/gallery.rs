//! Customer photo gallery.
//!
//! A customer picks one photo at a time, previews it, and uploads it into a
//! tab-scoped gallery. Uploaded photos are stored inline as data URLs in an
//! append-only log, so the gallery survives reloads within the tab without
//! any server round trip.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::constants::CUSTOMER_PHOTOS_KEY;
use crate::handoff::{StoreError, append_entry, read_entries};
use crate::notice::NoticeBoard;
use crate::photo::{PhotoFile, PhotoStager, PreviewProvider, StagedPhoto, StagingError};
use crate::storage::TabStorage;

/// Banner shown after a photo was added to the gallery.
pub const UPLOAD_SUCCESS_NOTICE: &str = "Photo uploaded successfully!";

/// Banner shown when upload is pressed with nothing selected.
pub const NOTHING_SELECTED_NOTICE: &str = "Please select a file first";

/// Banner shown when the gallery could not be written.
pub const UPLOAD_FAILURE_NOTICE: &str = "Failed to save photo. Please try again.";

/// One uploaded photo as kept in the gallery log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPhoto {
    /// Upload time in Unix milliseconds
    pub id: i64,
    /// File name as reported by the picker
    pub name: String,
    /// Declared media type
    #[serde(rename = "type")]
    pub media_type: String,
    /// Size in bytes
    pub size: u64,
    /// `data:` URL holding the whole file
    pub data: String,
    /// Upload time
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
}

impl CustomerPhoto {
    /// Decode the bytes behind the data URL, if it is a base64 one.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }
}

/// Build a base64 `data:` URL for `bytes`.
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Why an upload did not happen.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Upload pressed with no photo selected
    #[error("{}", NOTHING_SELECTED_NOTICE)]
    NothingSelected,

    /// Picked file was refused
    #[error(transparent)]
    Staging(#[from] StagingError),

    /// Gallery log could not be written
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Single-photo picker plus the tab's uploaded photos.
pub struct CustomerGallery<P: PreviewProvider, S, C = SystemClock> {
    selection: PhotoStager<P>,
    storage: S,
    clock: C,
    notices: NoticeBoard,
}

impl<P: PreviewProvider, S: TabStorage> CustomerGallery<P, S, SystemClock> {
    /// Create a gallery using the system clock.
    pub fn new(selection: PhotoStager<P>, storage: S) -> Self {
        Self::with_clock(selection, storage, SystemClock)
    }
}

impl<P: PreviewProvider, S: TabStorage, C: Clock> CustomerGallery<P, S, C> {
    /// Create a gallery with an explicit clock.
    pub fn with_clock(selection: PhotoStager<P>, storage: S, clock: C) -> Self {
        Self {
            selection,
            storage,
            clock,
            notices: NoticeBoard::default(),
        }
    }

    /// Pick `file` as the photo to upload.
    ///
    /// A refused file leaves the previous pick in place and raises an error
    /// banner with the reason.
    pub fn select(&mut self, file: PhotoFile<P::Source>) -> Result<(), GalleryError> {
        if let Err(e) = self.selection.check(&file) {
            self.notices.error(e.to_string());
            return Err(e.into());
        }
        self.selection.clear();
        if let Err(e) = self.selection.stage(vec![file]) {
            self.notices.error(e.to_string());
            return Err(e.into());
        }
        Ok(())
    }

    /// The picked photo, if any.
    pub fn selected(&self) -> Option<&StagedPhoto<P::Source>> {
        self.selection.staged().first()
    }

    /// Preview of the picked photo.
    pub fn preview_url(&self) -> Option<&str> {
        self.selected().map(StagedPhoto::preview_url)
    }

    /// Drop the picked photo and release its preview.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Every uploaded photo, oldest first. Malformed entries are skipped.
    pub fn photos(&self) -> Vec<CustomerPhoto> {
        read_entries(&self.storage, CUSTOMER_PHOTOS_KEY)
    }

    /// Banner board.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Banner board, for ticking and dismissing.
    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// Store the picked photo using `bytes` as its contents.
    ///
    /// On success the pick is cleared. A failed write keeps the pick so the
    /// customer can retry.
    pub fn upload_bytes(&mut self, bytes: &[u8]) -> Result<CustomerPhoto, GalleryError> {
        let Some(selected) = self.selected() else {
            self.notices.error(NOTHING_SELECTED_NOTICE);
            return Err(GalleryError::NothingSelected);
        };

        let now = self.clock.now();
        let photo = CustomerPhoto {
            id: now.timestamp_millis(),
            name: selected.name().to_string(),
            media_type: selected.media_type().to_string(),
            size: selected.size(),
            data: data_url(selected.media_type(), bytes),
            upload_date: now,
        };

        match append_entry(&self.storage, CUSTOMER_PHOTOS_KEY, &photo) {
            Ok(count) => {
                log::info!("Uploaded '{}' to gallery ({} photo(s))", photo.name, count);
                self.notices.success(UPLOAD_SUCCESS_NOTICE);
                self.selection.clear();
                Ok(photo)
            }
            Err(e) => {
                log::error!("Failed to store '{}': {}", photo.name, e);
                self.notices.error(UPLOAD_FAILURE_NOTICE);
                Err(e.into())
            }
        }
    }
}

impl<P: PreviewProvider<Source = Vec<u8>>, S: TabStorage, C: Clock> CustomerGallery<P, S, C> {
    /// Store the picked in-memory photo.
    pub fn upload(&mut self) -> Result<CustomerPhoto, GalleryError> {
        let bytes = self
            .selected()
            .map(|photo| photo.file().source.clone())
            .unwrap_or_default();
        self.upload_bytes(&bytes)
    }
}
