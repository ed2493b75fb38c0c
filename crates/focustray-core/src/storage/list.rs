//! Durable list storage.
//!
//! One opaque serialized payload per string key. The session log keeps its
//! whole timestamp sequence under a single key, so the store never needs to
//! understand the payload it holds.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::data_dir;
use crate::error::StorageError;

/// Get/set one serialized value per key.
///
/// `Send + Sync` so the session log's background writer can own a handle.
pub trait ListStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-per-key store under the data directory (`<key>.json`).
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store rooted at the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ListStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| StorageError::WriteFailed { path, source })
    }
}

/// In-memory store for tests and headless embedding.
#[derive(Debug, Default)]
pub struct MemoryListStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListStore for MemoryListStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
