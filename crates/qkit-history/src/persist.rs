#![forbid(unsafe_code)]

//! Best-effort durable persistence for the history and operation logs.
//!
//! Persisted state is a versioned JSON blob under an implementation-defined
//! key, opaque to everything outside this crate. Durability is best-effort:
//! callers log a failed write and continue, and a failed write never rolls
//! back the in-memory mutation that triggered it. Correctness lives in
//! memory; storage is a convenience for the next session.
//!
//! # File Format
//!
//! ```json
//! { "version": 1, "entries": ["draft one", "draft two"], "cursor": 1 }
//! ```
//!
//! ```json
//! { "version": 1, "records": [ { "name": "uppercase", "recorded_at": "..." } ] }
//! ```
//!
//! # Atomic Writes
//!
//! [`FileStore`] writes use a temp-file-then-rename pattern to prevent
//! corruption on crash.
//!
//! # Rehydration
//!
//! Loading is catch-and-reset: a corrupt or version-incompatible blob
//! hydrates as "absent" with a warning, and an out-of-range cursor is
//! clamped instead of rejected.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation_log::{OperationLog, OperationRecord};
use crate::snapshot_log::{HistoryConfig, SnapshotLog};

/// Current blob format version.
const FORMAT_VERSION: u64 = 1;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key-value storage, best-effort.
///
/// Implementations store opaque strings; the serialization schema is owned
/// by this module. `load` of a never-written key returns `Ok(None)`.
pub trait StateStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// File-backed store: one JSON file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        // Atomic write: temp file then rename
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }
}

// ============================================================================
// Wire schemas
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u64,
    entries: Vec<String>,
    cursor: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OperationsFile {
    version: u64,
    records: Vec<OperationRecord>,
}

// ============================================================================
// Save / load
// ============================================================================

/// Serialize a [`SnapshotLog`] into the store under `key`.
pub fn save_history(
    store: &mut dyn StateStore,
    key: &str,
    log: &SnapshotLog,
) -> Result<(), StorageError> {
    let file = HistoryFile {
        version: FORMAT_VERSION,
        entries: log.iter().map(|s| s.to_string()).collect(),
        cursor: log.cursor(),
    };
    store.save(key, &serde_json::to_string(&file)?)
}

/// Load a [`SnapshotLog`] from the store.
///
/// Returns `Ok(None)` when the key is absent, and also when the blob is
/// corrupt or carries an unknown version; both of the latter log a warning.
/// I/O failures are returned to the caller.
pub fn load_history(
    store: &dyn StateStore,
    key: &str,
    config: HistoryConfig,
) -> Result<Option<SnapshotLog>, StorageError> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    let file: HistoryFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt history blob");
            return Ok(None);
        }
    };
    if file.version != FORMAT_VERSION {
        tracing::warn!(key, version = file.version, "discarding unknown history version");
        return Ok(None);
    }
    Ok(Some(SnapshotLog::restore(config, file.entries, file.cursor)))
}

/// Serialize an [`OperationLog`] into the store under `key`.
pub fn save_operations(
    store: &mut dyn StateStore,
    key: &str,
    log: &OperationLog,
) -> Result<(), StorageError> {
    let file = OperationsFile {
        version: FORMAT_VERSION,
        records: log.iter().cloned().collect(),
    };
    store.save(key, &serde_json::to_string(&file)?)
}

/// Load an [`OperationLog`] from the store.
///
/// Same tolerance rules as [`load_history`].
pub fn load_operations(
    store: &dyn StateStore,
    key: &str,
    capacity: usize,
) -> Result<Option<OperationLog>, StorageError> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    let file: OperationsFile = match serde_json::from_str(&raw) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt operations blob");
            return Ok(None);
        }
    };
    if file.version != FORMAT_VERSION {
        tracing::warn!(key, version = file.version, "discarding unknown operations version");
        return Ok(None);
    }
    Ok(Some(OperationLog::restore(capacity, file.records)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.load("missing").unwrap(), None);
    }

    #[test]
    fn history_round_trip() {
        let mut store = MemoryStore::new();
        let mut log = SnapshotLog::default();
        log.push("a");
        log.push("b");
        log.undo();

        save_history(&mut store, "history", &log).unwrap();
        let loaded = load_history(&store, "history", HistoryConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cursor(), Some(0));
        assert_eq!(loaded.current().map(|s| s.as_ref()), Some("a"));
    }

    #[test]
    fn operations_round_trip() {
        let mut store = MemoryStore::new();
        let mut log = OperationLog::default();
        log.record("uppercase");
        log.record("join-lines");

        save_operations(&mut store, "ops", &log).unwrap();
        let loaded = load_operations(&store, "ops", log.capacity())
            .unwrap()
            .unwrap();

        let names: Vec<&str> = loaded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["join-lines", "uppercase"]);
    }

    #[test]
    fn corrupt_blob_loads_as_absent() {
        let mut store = MemoryStore::new();
        store.save("history", "{not json").unwrap();
        let loaded = load_history(&store, "history", HistoryConfig::default()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn unknown_version_loads_as_absent() {
        let mut store = MemoryStore::new();
        store
            .save("history", r#"{"version":99,"entries":["a"],"cursor":0}"#)
            .unwrap();
        let loaded = load_history(&store, "history", HistoryConfig::default()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn stored_cursor_out_of_range_is_clamped() {
        let mut store = MemoryStore::new();
        store
            .save("history", r#"{"version":1,"entries":["a","b"],"cursor":41}"#)
            .unwrap();
        let loaded = load_history(&store, "history", HistoryConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.cursor(), Some(1));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save("quillkit.history", r#"{"version":1}"#).unwrap();
        assert_eq!(
            store.load("quillkit.history").unwrap().as_deref(),
            Some(r#"{"version":1}"#)
        );
        assert_eq!(store.load("other").unwrap(), None);
    }

    #[test]
    fn file_store_overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save("k", "one").unwrap();
        store.save("k", "two").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("two"));
        // No temp file left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn file_store_creates_root_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("quillkit");
        let mut store = FileStore::new(&nested);
        store.save("k", "v").unwrap();
        assert!(nested.is_dir());
    }
}
