//! Durable storage for the session token and the cached identity.
//!
//! The layout mirrors a browser's local storage: a flat map of keys to JSON
//! values. [`FileStorage`] keeps that map in a single JSON file.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Fixed key of the opaque credential token
pub const TOKEN_KEY: &str = "token";

/// Key of the identity snapshot cached next to the token
pub const IDENTITY_KEY: &str = "user";

/// File name of the session store inside the data directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value storage that survives process restarts
pub trait SessionStorage: Send + Sync {
    /// Read one key
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Write several keys in one step
    fn set_entries(&self, entries: Vec<(&str, Value)>) -> Result<(), StorageError>;

    /// Remove keys; removing an absent key is not an error
    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Session storage backed by a JSON file, written atomically
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage at `<data_dir>/session.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_err(e))?;

        let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_err(e))?;
        let body = serde_json::to_vec_pretty(map).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        file.write_all(&body).map_err(|e| self.io_err(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_err(e))?;
        }

        file.persist(&self.path).map_err(|e| self.io_err(e.error))?;
        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_map()?.remove(key))
    }

    fn set_entries(&self, entries: Vec<(&str, Value)>) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut map = match self.read_map() {
            Ok(map) => map,
            // A corrupt file is replaced rather than merged into.
            Err(StorageError::Corrupt { .. }) => Map::new(),
            Err(e) => return Err(e),
        };
        for (key, value) in entries {
            map.insert(key.to_string(), value);
        }
        self.write_map(&map)
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut map = match self.read_map() {
            Ok(map) => map,
            // A corrupt file holds no usable session; drop it.
            Err(StorageError::Corrupt { .. }) => Map::new(),
            Err(e) => return Err(e),
        };
        for key in keys {
            map.remove(*key);
        }
        if map.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.io_err(e)),
            };
        }
        self.write_map(&map)
    }
}

/// In-process storage, used when nothing should touch the disk
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_entries(&self, entries: Vec<(&str, Value)>) -> Result<(), StorageError> {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
