//! Persisted layout and grouping store.
//!
//! A list saves its grouping and column layout under a caller-supplied
//! storage name. Reading is forgiving: a missing entry, unreadable file,
//! corrupt JSON or a layout saved for a different set of columns all mean
//! "no stored layout" and the list keeps its defaults. Nothing here is fatal
//! to the list.

pub mod layout;

pub use layout::{load_layout, save_layout, ColumnLayout, PersistedLayout};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the backing store. Recovered by the caller, never surfaced
/// to the host as list errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage name cannot be used as a key.
    #[error("Invalid storage name '{0}'")]
    InvalidName(String),

    /// Filesystem access failed.
    #[error("Layout storage I/O failed at {path:?}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A layout could not be encoded or decoded.
    #[error("Layout JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value store for serialized layouts.
pub trait LayoutStorage {
    /// Stored value for `key`, `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Backend failures.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory storage, for tests and hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStorage {
    entries: HashMap<String, String>,
}

impl MemoryLayoutStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStorage for MemoryLayoutStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// One `<name>.json` file per storage name inside a directory.
#[derive(Debug, Clone)]
pub struct FileLayoutStorage {
    dir: PathBuf,
}

impl FileLayoutStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidName(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LayoutStorage for FileLayoutStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}
