//! Key-value stores for persisted hunter data.
//!
//! Every persisted value is a JSON document addressed by a string key. The
//! [`KeyValueStore`] trait is the seam between the profile logic and the
//! backing medium: [`FileStore`] keeps one file per key on disk and
//! [`MemoryStore`] keeps everything in a map for tests and throwaway sessions.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/hunter/                  # Linux
//! ~/Library/Application Support/hunter/   # macOS
//! └── store/
//!     ├── hunter-user-id.json
//!     ├── {userId}-tasks.json
//!     ├── {userId}-playerLevel.json
//!     ├── {userId}-playerXP.json
//!     └── {userId}-streak.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{Result, StorageError};

/// A flat namespace of JSON documents.
///
/// Implementations must be usable from several threads; methods take `&self`.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be read or parsed.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Removes the value under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing value cannot be removed.
    fn remove(&self, key: &str) -> Result<()>;
}

/// A store keeping one pretty-printed JSON file per key.
///
/// # Examples
///
/// ```no_run
/// use hunter_storage::{FileStore, KeyValueStore};
///
/// # fn example() -> hunter_storage::Result<()> {
/// let store = FileStore::new()?;
/// store.set("greeting", &serde_json::json!("hello"))?;
/// assert_eq!(store.get("greeting")?, Some(serde_json::json!("hello")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Creates a store in the platform data directory.
    ///
    /// - Linux: `~/.local/share/hunter/store/`
    /// - macOS: `~/Library/Application Support/hunter/store/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\hunter\store\`
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined or the
    /// store directory cannot be created.
    #[instrument]
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDirectory)?;
        Self::in_data_dir(&data_dir.join("hunter"))
    }

    /// Creates a store under `data_dir/store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn in_data_dir(data_dir: &Path) -> Result<Self> {
        Self::with_path(data_dir.join("store"))
    }

    /// Creates a store rooted exactly at `base_path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[instrument]
    pub fn with_path(base_path: PathBuf) -> Result<Self> {
        if !base_path.exists() {
            debug!(?base_path, "creating store directory");
            fs::create_dir_all(&base_path).map_err(|source| StorageError::Io {
                path: base_path.clone(),
                source,
            })?;
        }
        Ok(Self { base_path })
    }

    /// The directory holding the store's files.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the file backing `key`.
    ///
    /// Path separators and dots are replaced so a key can never escape the
    /// store directory.
    fn key_path(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', '\\', '.'], "_");
        self.base_path.join(format!("{safe_key}.json"))
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let value = serde_json::from_str(&content).map_err(|source| {
                    warn!(?path, error = %source, "stored document is not valid JSON");
                    StorageError::Malformed {
                        key: key.to_string(),
                        source,
                    }
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "no stored value");
                Ok(None)
            }
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.key_path(key);
        let content = serde_json::to_string_pretty(value).map_err(|source| {
            StorageError::Serialize {
                key: key.to_string(),
                source,
            }
        })?;
        fs::write(&path, content).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(?path, "value saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// An in-memory store. Nothing survives the process.
///
/// # Examples
///
/// ```
/// use hunter_storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// assert_eq!(store.get("missing").unwrap(), None);
///
/// store.set("streak", &serde_json::json!(3)).unwrap();
/// assert_eq!(store.get("streak").unwrap(), Some(serde_json::json!(3)));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}
