//! Product selection and registration handoff store.
//!
//! Carries the chosen product from the product list to the registration view,
//! and keeps the append-only log of submitted registrations. Everything lives
//! in tab-scoped storage, so it survives navigation and reloads within a tab
//! and disappears when the tab is closed.
//!
//! Data read back from storage is untrusted: anything that fails to decode is
//! logged and treated as absent, never surfaced as an error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::constants::{REGISTRATIONS_KEY, SELECTED_PRODUCT_KEY};
use crate::model::{Product, RegistrationRecord};
use crate::storage::{StorageError, TabStorage};

/// Errors raised when writing to the handoff store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend refused the write
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Value could not be serialized
    #[error("Failed to serialize handoff data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Product price cannot be represented in JSON
    #[error("Product {id} has no finite price")]
    InvalidPrice {
        /// Product identifier
        id: u64,
    },
}

/// Tab-scoped handoff state: zero or one selected product plus the
/// registration log.
///
/// Views never cache what they read from here; every read goes to storage.
pub struct HandoffStore<S> {
    storage: S,
}

impl<S: TabStorage> HandoffStore<S> {
    /// Create a store over the given backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access the underlying backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replace the current selection with a snapshot of `product`.
    pub fn set_selected_product(&self, product: &Product) -> Result<(), StoreError> {
        // serde_json writes non-finite floats as null, which would not read back
        if !product.price.is_finite() {
            return Err(StoreError::InvalidPrice { id: product.id });
        }
        let json = serde_json::to_string(product)?;
        self.storage.set(SELECTED_PRODUCT_KEY, &json)?;
        log::debug!("Selected product {} ('{}')", product.id, product.name);
        Ok(())
    }

    /// The last selected product, or `None` if unset, cleared or unreadable.
    pub fn selected_product(&self) -> Option<Product> {
        let json = self.read(SELECTED_PRODUCT_KEY)?;
        match serde_json::from_str(&json) {
            Ok(product) => Some(product),
            Err(e) => {
                log::warn!("Ignoring unreadable selected product: {}", e);
                None
            }
        }
    }

    /// Forget the current selection.
    pub fn clear_selected_product(&self) -> Result<(), StoreError> {
        self.storage.remove(SELECTED_PRODUCT_KEY)?;
        Ok(())
    }

    /// Append a record to the registration log.
    ///
    /// Existing entries are kept verbatim, including ones this client cannot
    /// decode. Only a log that is not a JSON array at all is replaced.
    pub fn append_registration(&self, record: &RegistrationRecord) -> Result<(), StoreError> {
        let count = append_entry(&self.storage, REGISTRATIONS_KEY, record)?;
        log::info!(
            "Logged registration #{} for '{}'",
            count,
            record.product_name().unwrap_or("no product")
        );
        Ok(())
    }

    /// Every logged registration, oldest first.
    pub fn registrations(&self) -> Vec<RegistrationRecord> {
        read_entries(&self.storage, REGISTRATIONS_KEY)
    }

    /// Drop the selection and the registration log.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(SELECTED_PRODUCT_KEY)?;
        self.storage.remove(REGISTRATIONS_KEY)?;
        log::debug!("Handoff store cleared");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        read_raw(&self.storage, key)
    }
}

fn read_raw(storage: &impl TabStorage, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to read '{}' from tab storage: {}", key, e);
            None
        }
    }
}

/// Split a log into its raw entries; anything but an array reads as empty.
fn raw_entries(key: &str, json: &str) -> Vec<serde_json::Value> {
    match serde_json::from_str(json) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Ignoring unreadable '{}' log: {}", key, e);
            Vec::new()
        }
    }
}

/// Append `entry` to the JSON array log under `key`, keeping every existing
/// entry as stored. Returns the new log length.
pub(crate) fn append_entry<T: Serialize>(
    storage: &impl TabStorage,
    key: &str,
    entry: &T,
) -> Result<usize, StoreError> {
    // Read straight from the backend so a failing read is not mistaken
    // for an empty log and overwritten.
    let existing = storage.get(key)?;
    let mut entries = existing
        .as_deref()
        .map(|json| raw_entries(key, json))
        .unwrap_or_default();

    entries.push(serde_json::to_value(entry)?);
    storage.set(key, &serde_json::to_string(&entries)?)?;
    Ok(entries.len())
}

/// Decode the log under `key` entry by entry, skipping anything malformed.
pub(crate) fn read_entries<T: DeserializeOwned>(storage: &impl TabStorage, key: &str) -> Vec<T> {
    let Some(json) = read_raw(storage, key) else {
        return Vec::new();
    };
    raw_entries(key, &json)
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping malformed '{}' entry #{}: {}", key, i + 1, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::Category;
    use crate::storage::MemoryStorage;

    fn lamp() -> Product {
        Product::new(7, "Lamp", 19.99)
            .with_description("Brass desk lamp")
            .with_category(Category::new(2, "Lighting"))
            .with_image("https://cdn.example.com/lamp.jpg")
    }

    fn record(name: &str) -> RegistrationRecord {
        RegistrationRecord {
            name: name.to_string(),
            email: "a@x.com".to_string(),
            phone: "5551234".to_string(),
            location: "Cairo".to_string(),
            quantity: 2,
            product: Some(lamp()),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_selected_product_roundtrip() {
        let store = HandoffStore::new(MemoryStorage::new());
        assert!(store.selected_product().is_none());

        let product = lamp();
        store.set_selected_product(&product).unwrap();
        assert_eq!(store.selected_product(), Some(product));
    }

    #[test]
    fn test_selection_overwrites() {
        let store = HandoffStore::new(MemoryStorage::new());
        store.set_selected_product(&lamp()).unwrap();
        store
            .set_selected_product(&Product::new(8, "Rug", 45.0))
            .unwrap();

        assert_eq!(store.selected_product().unwrap().name, "Rug");
    }

    #[test]
    fn test_non_finite_price_not_stored() {
        let store = HandoffStore::new(MemoryStorage::new());
        store.set_selected_product(&lamp()).unwrap();

        let err = store
            .set_selected_product(&Product::new(9, "Void", f64::NAN))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPrice { id: 9 }));
        assert_eq!(store.selected_product(), Some(lamp()));
    }

    #[test]
    fn test_cleared_storage_reads_absent() {
        let storage = Rc::new(MemoryStorage::new());
        let store = HandoffStore::new(Rc::clone(&storage));
        store.set_selected_product(&lamp()).unwrap();

        storage.clear().unwrap();
        assert!(store.selected_product().is_none());
        assert!(store.registrations().is_empty());
    }

    #[test]
    fn test_corrupt_selection_reads_absent() {
        let storage = MemoryStorage::new();
        storage.set(SELECTED_PRODUCT_KEY, "{not json").unwrap();
        let store = HandoffStore::new(storage);
        assert!(store.selected_product().is_none());

        store
            .storage()
            .set(SELECTED_PRODUCT_KEY, r#"{"title": "foreign shape"}"#)
            .unwrap();
        assert!(store.selected_product().is_none());
    }

    #[test]
    fn test_append_preserves_order() {
        let store = HandoffStore::new(MemoryStorage::new());
        store.append_registration(&record("Alex")).unwrap();
        store.append_registration(&record("Sam")).unwrap();
        store.append_registration(&record("Alex")).unwrap();

        let names: Vec<String> = store.registrations().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alex", "Sam", "Alex"]);
    }

    #[test]
    fn test_corrupt_log_treated_as_empty() {
        let storage = MemoryStorage::new();
        storage.set(REGISTRATIONS_KEY, "[[[").unwrap();
        let store = HandoffStore::new(storage);
        assert!(store.registrations().is_empty());

        store.append_registration(&record("Alex")).unwrap();
        assert_eq!(store.registrations().len(), 1);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let store = HandoffStore::new(MemoryStorage::new());
        store.append_registration(&record("Alex")).unwrap();

        let raw = store.storage().get(REGISTRATIONS_KEY).unwrap().unwrap();
        let patched = raw.replacen('[', r#"[{"name": 42},"#, 1);
        store.storage().set(REGISTRATIONS_KEY, &patched).unwrap();

        let log = store.registrations();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].name, "Alex");
    }

    #[test]
    fn test_append_keeps_undecodable_entries() {
        let storage = MemoryStorage::new();
        let legacy = r#"{"name":"Old","email":"o@x.com","phonenumber":"1","location":"Giza","quantity":"3","product":null,"timestamp":"2026-01-01T00:00:00.000Z"}"#;
        storage
            .set(REGISTRATIONS_KEY, &format!("[{}]", legacy))
            .unwrap();
        let store = HandoffStore::new(storage);

        store.append_registration(&record("Alex")).unwrap();

        let raw = store.storage().get(REGISTRATIONS_KEY).unwrap().unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], serde_json::from_str::<serde_json::Value>(legacy).unwrap());
        assert_eq!(entries[1]["name"], "Alex");

        let names: Vec<String> = store.registrations().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alex"]);
    }

    #[test]
    fn test_clear_drops_both_keys() {
        let store = HandoffStore::new(MemoryStorage::new());
        store.set_selected_product(&lamp()).unwrap();
        store.append_registration(&record("Alex")).unwrap();

        store.clear().unwrap();
        assert!(store.selected_product().is_none());
        assert!(store.registrations().is_empty());
        assert!(store.storage().is_empty());
    }
}
