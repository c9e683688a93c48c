#![forbid(unsafe_code)]

//! Log of recently applied named operations.
//!
//! [`OperationLog`] remembers which transforms the user ran so a shortcut
//! panel can offer them again. Records are ordered most-recent-first and
//! unique by name: re-recording a name moves it to the front instead of
//! duplicating it. The log stores only the *name* and a timestamp; the
//! callable itself lives in the transform registry, so every logged name is
//! replayable exactly when the registry resolves it.
//!
//! Capacity is small by design (default 5). Recording past capacity drops
//! the least recently recorded name from the tail.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of operations retained.
pub const DEFAULT_OPERATION_CAPACITY: usize = 5;

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Registry name of the transform.
    pub name: String,
    /// When the operation was last applied.
    pub recorded_at: DateTime<Utc>,
}

/// Most-recent-first log of named operations, unique by name.
#[derive(Debug, Clone)]
pub struct OperationLog {
    /// Records, newest at the front.
    records: VecDeque<OperationRecord>,
    capacity: usize,
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATION_CAPACITY)
    }
}

impl OperationLog {
    /// Create an empty log with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Rebuild a log from persisted records (newest first).
    ///
    /// Duplicate names keep their first (most recent) occurrence; excess
    /// records are dropped from the tail.
    #[must_use]
    pub fn restore(capacity: usize, records: Vec<OperationRecord>) -> Self {
        let mut log = Self::new(capacity);
        for record in records {
            if log.records.len() >= capacity {
                break;
            }
            if !log.contains(&record.name) {
                log.records.push_back(record);
            }
        }
        log
    }

    /// Record an operation by name.
    ///
    /// An existing record with the same name (case-sensitive) is removed
    /// first, then a fresh record is inserted at the front and the tail is
    /// trimmed to capacity.
    pub fn record(&mut self, name: &str) {
        if let Some(pos) = self.records.iter().position(|r| r.name == name) {
            self.records.remove(pos);
        }
        self.records.push_front(OperationRecord {
            name: name.to_string(),
            recorded_at: Utc::now(),
        });
        self.records.truncate(self.capacity);
        tracing::debug!(name, retained = self.records.len(), "operation recorded");
    }

    /// Remove the record at `index` (0 = newest). Out of range is a no-op.
    pub fn remove(&mut self, index: usize) {
        if index < self.records.len() {
            self.records.remove(index);
        }
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Check whether a name is currently recorded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    /// Records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &OperationRecord> {
        self.records.iter()
    }

    /// Names in replay order: oldest recorded first.
    pub fn names_oldest_first(&self) -> impl Iterator<Item = &str> {
        self.records.iter().rev().map(|r| r.name.as_str())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Capacity limit.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ============================================================================
// Tests
// ============================================================================
