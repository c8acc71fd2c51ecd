//! Key/value persistence
//!
//! High scores and settings are small JSON documents stored under fixed
//! keys. Backends:
//! - `MemoryStore`: in-process map (tests, fallback when nothing else works)
//! - `FileStore`: one `<key>.json` file per key (native)
//! - `LocalStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;
use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage failure
#[derive(Debug)]
pub enum StorageError {
    /// Backend not reachable (no LocalStorage, private mode, ...)
    Unavailable(String),
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(why) => write!(f, "storage unavailable: {why}"),
            Self::Io(err) => write!(f, "storage i/o error: {err}"),
            Self::Serialize(err) => write!(f, "invalid stored data: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unavailable(_) => None,
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

/// String key/value store
pub trait KeyValueStore {
    /// `Ok(None)` when nothing is stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read and decode a JSON value. Missing keys yield `Ok(None)`.
pub fn load_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: serde::Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
