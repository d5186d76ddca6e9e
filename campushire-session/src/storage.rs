//! Credential storage port
//!
//! Abstracts the ambient key-value storage a client installation provides, so
//! the token store can run against files in real clients and against an
//! in-memory fake in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-level error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Key-value persistence scoped to the client installation
///
/// `delete` reports whether the key existed instead of failing on absence;
/// repeated deletes are not an error.
pub trait CredentialStorage: Send + Sync {
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn delete(&self, key: &str) -> StorageResult<bool>;
}

/// In-memory storage for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.data.lock().unwrap().remove(key).is_some())
    }
}

/// File-backed storage: one file per key under a storage directory
#[derive(Debug)]
pub struct FileStorage {
    storage_dir: PathBuf,
}

impl FileStorage {
    /// Create a file-backed store, creating the directory if needed
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> StorageResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&storage_dir).map_err(|e| StorageError::Io {
            key: storage_dir.display().to_string(),
            source: e,
        })?;

        info!("Credential storage initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.storage_dir.join(key)
    }
}

impl CredentialStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        std::fs::write(self.key_path(key), value).map_err(|e| StorageError::Io {
            key: key.to_string(),
            source: e,
        })
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap(), Some("abc".to_string()));

        storage.set("token", "def").unwrap();
        assert_eq!(storage.get("token").unwrap(), Some("def".to_string()));
    }

    #[test]
    fn test_memory_storage_delete_reports_presence() {
        let storage = MemoryStorage::new();

        storage.set("user", "{}").unwrap();
        assert!(storage.delete("user").unwrap());
        assert!(!storage.delete("user").unwrap());
        assert_eq!(storage.get("user").unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap(), Some("abc".to_string()));
        assert_eq!(storage.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_storage_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("token", "abc").unwrap();
        assert!(storage.delete("token").unwrap());
        assert!(!storage.delete("token").unwrap());
    }

    #[test]
    fn test_file_storage_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("campushire").join("credentials");

        let storage = FileStorage::new(&nested).unwrap();
        storage.set("token", "abc").unwrap();

        assert!(nested.join("token").exists());
    }
}
