//! Map storage backends.
//!
//! A [`MapStore`] holds one flat `username → value` map and is always read
//! and written whole. [`JsonFileStore`] keeps it in a pretty-printed UTF-8
//! JSON file; [`MemoryStore`] keeps it in a mutex for tests and previews.
//!
//! There is no locking across processes: two writers racing on the same file
//! lose updates, last writer wins.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// `username → value`, in the order users were first saved.
pub type UserMap<V> = IndexMap<String, V>;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised while reading or writing a map.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file exists but could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold the expected JSON object.
    #[error("{path} is not a valid JSON map: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A previous writer panicked while holding the in-memory map.
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

// ---------------------------------------------------------------------------
// MapStore trait
// ---------------------------------------------------------------------------

/// Whole-map load / save of a `username → V` mapping.
pub trait MapStore<V>: Send + Sync {
    /// Return the full map; an absent backing store is an empty map.
    fn load_map(&self) -> Result<UserMap<V>, StoreError>;

    /// Replace the stored map with `map`.
    fn save_map(&self, map: &UserMap<V>) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// JSON file helpers
// ---------------------------------------------------------------------------

/// Parse the JSON object at `path`, or return an empty map if the file does
/// not exist.
///
/// A file that exists but is not valid JSON is an error.
pub fn load_map<V: DeserializeOwned>(path: &Path) -> Result<UserMap<V>, StoreError> {
    if !path.exists() {
        return Ok(UserMap::new());
    }

    let data = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&data).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Rewrite `path` with `map`: 2-space indentation, non-ASCII text left
/// unescaped.
pub fn save_map<V: Serialize>(path: &Path, map: &UserMap<V>) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let data = serde_json::to_string_pretty(map).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, data).map_err(io_err)
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A map persisted as a single JSON file.
pub struct JsonFileStore<V> {
    path: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonFileStore<V> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }
}

impl<V: Serialize + DeserializeOwned> MapStore<V> for JsonFileStore<V> {
    fn load_map(&self) -> Result<UserMap<V>, StoreError> {
        load_map(&self.path)
    }

    fn save_map(&self, map: &UserMap<V>) -> Result<(), StoreError> {
        save_map(&self.path, map)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A map held in memory; starts empty.
pub struct MemoryStore<V> {
    map: Mutex<UserMap<V>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(UserMap::new()),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> MapStore<V> for MemoryStore<V> {
    fn load_map(&self) -> Result<UserMap<V>, StoreError> {
        self.map
            .lock()
            .map(|m| m.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save_map(&self, map: &UserMap<V>) -> Result<(), StoreError> {
        let mut guard = self.map.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = map.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
