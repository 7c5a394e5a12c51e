//! Session persistence side channel
//!
//! A small key-value store holding serialized records. The session store
//! keeps exactly one record in it; the backends here only move strings.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tf_core::config::{SessionBackend, SessionConfig};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("Storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Key-value backend for persisted session records
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Read a record, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a record, replacing any prior value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a record; deleting an absent record succeeds
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Build the backend selected by the configuration
pub fn open_storage(config: &SessionConfig) -> Arc<dyn SessionStorage> {
    match config.backend {
        SessionBackend::Memory => Arc::new(MemoryStorage::new()),
        SessionBackend::File => Arc::new(FileStorage::new(&config.storage_path)),
    }
}

// ============================================================================
// Memory
// ============================================================================

/// In-memory storage (for development/testing)
///
/// Share one instance through an `Arc` across several session stores to
/// model a process restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records.write().remove(key);
        Ok(())
    }
}

// ============================================================================
// File
// ============================================================================

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.record_path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        // Readers never observe a half-written record.
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        std::fs::write(&tmp, value).map_err(|e| Self::io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Self::io_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.record_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("user").unwrap(), None);

        storage.set("user", "{}").unwrap();
        assert_eq!(storage.get("user").unwrap().as_deref(), Some("{}"));

        storage.set("user", "[]").unwrap();
        assert_eq!(storage.get("user").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);

        storage.remove("user").unwrap();
        storage.remove("user").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("session"));

        assert_eq!(storage.get("user").unwrap(), None);
        storage.set("user", r#"{"id":"1"}"#).unwrap();
        assert!(tmp.path().join("session").join("user.json").exists());
        assert!(!tmp.path().join("session").join(".user.json.tmp").exists());

        // A second handle over the same directory sees the record
        let reopened = FileStorage::new(storage.dir());
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some(r#"{"id":"1"}"#));

        reopened.remove("user").unwrap();
        reopened.remove("user").unwrap();
        assert_eq!(storage.get("user").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());

        for key in ["", "../user", "a/b", ".hidden"] {
            assert!(matches!(
                storage.set(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_open_storage_selects_backend() {
        let tmp = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            backend: SessionBackend::File,
            storage_path: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let storage = open_storage(&config);
        storage.set("user", "value").unwrap();
        assert!(tmp.path().join("user.json").exists());

        let memory = open_storage(&SessionConfig::default());
        memory.set("user", "value").unwrap();
        assert_eq!(memory.get("user").unwrap().as_deref(), Some("value"));
    }
}
