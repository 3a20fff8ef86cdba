//! Preference and selection persistence
//!
//! A small key/value store with typed JSON helpers. Failures never reach the
//! selection logic: reads fall back to defaults and write errors are reported
//! back as actions.
//!
//! Writes go through [`RevisionedWriter`], which drops any write older than
//! the newest one already applied for the same key. Effects run concurrently,
//! so without it a slow earlier write could land after a later one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Key under which the selected seats are stored
pub const SELECTED_SEATS_KEY: &str = "venue-selected-seats";

/// Key under which the dark-mode preference is stored
pub const DARK_MODE_KEY: &str = "dark-mode";

/// Errors produced by a [`KeyValueStore`]
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the backing file failed
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters the store cannot represent
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Store cannot be used right now
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous key/value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` if the key is absent
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store cannot be written.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError>;

    /// Delete a value; absent keys are not an error
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Read a JSON value, falling back to `default` on any failure
///
/// Missing keys, unreadable storage and undecodable values all yield the
/// default; the latter two are logged.
pub fn load_or_default<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|error| {
            tracing::warn!(key, %error, "Stored value could not be decoded, using default");
            default
        }),
        Ok(None) => default,
        Err(error) => {
            tracing::warn!(key, %error, "Storage read failed, using default");
            default
        },
    }
}

/// Encode a value as JSON and write it
///
/// # Errors
///
/// Returns [`PersistenceError::Serialization`] if encoding fails, or whatever
/// the store reports.
pub fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes)
}

/// Values kept in memory for the life of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store files under `dir`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");
        let io = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::write(&staging, value).map_err(io)?;
        std::fs::rename(&staging, &path).map_err(io)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Err(error) if error.kind() != std::io::ErrorKind::NotFound => Err(PersistenceError::Io {
                key: key.to_string(),
                source: error,
            }),
            _ => Ok(()),
        }
    }
}

/// Result of a revisioned write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Value was written
    Written,
    /// A newer revision was already written; this one was dropped
    Superseded,
}

/// Serializes writes per key and drops out-of-order ones
pub struct RevisionedWriter {
    store: Arc<dyn KeyValueStore>,
    applied: Mutex<HashMap<String, u64>>,
}

impl RevisionedWriter {
    /// Wrap a store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            applied: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Encode `value` as JSON and write it under `key`, unless a newer
    /// revision was already written
    ///
    /// The lock is held across the store call, so writes to the same writer
    /// are applied one at a time.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Serialization`] if encoding fails, or
    /// whatever the store reports. A failed write does not advance the key's
    /// revision.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        key: &str,
        revision: u64,
        value: &T,
    ) -> Result<WriteOutcome, PersistenceError> {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if applied.get(key).is_some_and(|&last| last >= revision) {
            tracing::debug!(key, revision, "Dropping superseded write");
            return Ok(WriteOutcome::Superseded);
        }
        save(self.store.as_ref(), key, value)?;
        applied.insert(key.to_string(), revision);
        Ok(WriteOutcome::Written)
    }
}

impl std::fmt::Debug for RevisionedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionedWriter").finish_non_exhaustive()
    }
}
