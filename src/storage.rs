//! Key-value persistence for the task list

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::constants::STORAGE_KEY;
use crate::models::Task;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("value under '{key}' is not a valid task list: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value under '{key}' is not UTF-8 text: {source}")]
    NotText {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl StoreError {
    /// The stored bytes exist but cannot be read as a task list
    pub fn is_unreadable(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. } | StoreError::NotText { .. })
    }
}

/// Result of loading at startup
#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<Task>),
    /// Unreadable data was moved to `aside`; start empty
    Quarantined { aside: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key-value store backing the task list
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    /// Move a value to another key without decoding it. Returns false if `from` is missing.
    fn rename(&self, from: &str, to: &str) -> StoreResult<bool>;
}

/// One JSON file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn ensure_dir(&self) -> io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let bytes = match fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| StoreError::NotText {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.ensure_dir()?;
        let path = self.path(key);
        // Write then rename so a crash never leaves a half-written file behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn rename(&self, from: &str, to: &str) -> StoreResult<bool> {
        match fs::rename(self.path(from), self.path(to)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store; clones share the same map
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> StoreResult<bool> {
        let mut entries = self.entries();
        match entries.remove(from) {
            Some(value) => {
                entries.insert(to.to_string(), value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Reads and writes the task list under a single key
pub struct TaskStore<S> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(kv: S) -> Self {
        TaskStore {
            kv,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Load the persisted list. A missing key is an empty list.
    pub fn load(&self) -> StoreResult<Vec<Task>> {
        let Some(raw) = self.kv.get(&self.key)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: self.key.clone(),
            source,
        })
    }

    /// Serialize and write the full list
    pub fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        let json = serde_json::to_string(tasks).map_err(StoreError::Encode)?;
        self.kv.set(&self.key, &json)
    }

    /// Move the stored value aside so the next save cannot overwrite it.
    /// Returns the key it was moved to, if there was anything to move.
    pub fn quarantine(&self, now: DateTime<Utc>) -> StoreResult<Option<String>> {
        let aside = format!("{}.corrupt-{}", self.key, now.format("%Y%m%d%H%M%S"));
        if !self.kv.rename(&self.key, &aside)? {
            return Ok(None);
        }
        tracing::warn!(from = %self.key, to = %aside, "Quarantined unreadable task data");
        Ok(Some(aside))
    }

    /// Load for startup. Unreadable data is set aside; any other failure,
    /// including a failed quarantine, is returned so nothing gets overwritten.
    pub fn load_or_quarantine(&self, now: DateTime<Utc>) -> StoreResult<LoadOutcome> {
        match self.load() {
            Ok(tasks) => Ok(LoadOutcome::Loaded(tasks)),
            Err(e) if e.is_unreadable() => {
                tracing::error!(key = %self.key, error = %e, "Stored tasks are unreadable");
                match self.quarantine(now)? {
                    Some(aside) => Ok(LoadOutcome::Quarantined { aside }),
                    None => Ok(LoadOutcome::Loaded(Vec::new())),
                }
            }
            Err(e) => Err(e),
        }
    }
}
