//! Browser LocalStorage backend

use web_sys::Storage;

use super::{KeyValueStore, StorageError};

/// `window.localStorage` wrapper
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    /// Never fails; a missing LocalStorage surfaces as `Unavailable` on use
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage not available - scores will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("no localStorage".to_string()))
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}
