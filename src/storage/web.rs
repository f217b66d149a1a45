//! Browser `Storage` backend (WASM only).

use super::{StorageError, TabStorage};

/// `sessionStorage` or `localStorage` of the current window.
pub struct WebStorage {
    inner: web_sys::Storage,
}

impl WebStorage {
    /// Tab-scoped storage, cleared when the tab closes.
    pub fn session() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object available".to_string()))?;
        let inner = window
            .session_storage()
            .map_err(|e| StorageError::Unavailable(format!("sessionStorage access error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("sessionStorage not available".to_string()))?;
        Ok(Self { inner })
    }

    /// Origin-scoped storage that survives the tab.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object available".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))?;
        Ok(Self { inner })
    }
}

impl TabStorage for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Access(format!("Failed to read '{}': {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Access(format!("Failed to write '{}': {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Access(format!("Failed to remove '{}': {:?}", key, e)))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.inner
            .clear()
            .map_err(|e| StorageError::Access(format!("Failed to clear storage: {:?}", e)))
    }
}
