//! Key-value persistence seam for the client store.
//!
//! The store talks to a [`Storage`] trait instead of a concrete backend, so
//! tests run against [`MemoryStorage`] and the real app against
//! [`FileStorage`]. Writes are synchronous: `store` returns only after the
//! value is durable (or has been kept in memory).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Two entries are used in practice: the task array and the last-selected
/// filter.
pub trait Storage {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory fake, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: one JSON object of key → value entries, rewritten
/// in full on every store.
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open the backing file, tolerating a missing or unreadable one by
    /// starting empty.
    pub fn open(path: &Path) -> Self {
        let entries = std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path: path.to_owned(),
            entries,
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| StorageError::Write(e.to_string()))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
