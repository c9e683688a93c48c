#![forbid(unsafe_code)]

//! Bounded linear snapshot log for undo/redo.
//!
//! [`SnapshotLog`] keeps full-text snapshots of the document in a single
//! ordered sequence with one cursor marking the currently displayed state.
//! There is no diffing: every entry is a complete copy, stored behind an
//! `Arc<str>` so handing a snapshot back to the caller never re-copies the
//! text.
//!
//! # Invariants
//!
//! 1. `cursor` is `None` iff the log is empty.
//! 2. `cursor < entries.len()` whenever `Some`.
//! 3. `entries.len() <= config.max_entries` after any operation.
//! 4. A push discards everything after the cursor (the redo branch) before
//!    appending.
//!
//! ```text
//! push(d) with cursor on b
//! ┌─────────────────────────────┐      ┌─────────────────────────────┐
//! │ entries: [a, b, c]          │  ──► │ entries: [a, b, d]          │
//! │ cursor:        ^b           │      │ cursor:        ^d           │
//! └─────────────────────────────┘      └─────────────────────────────┘
//!
//! push(e) at capacity 3
//! ┌─────────────────────────────┐      ┌─────────────────────────────┐
//! │ entries: [a, b, d]          │  ──► │ entries: [b, d, e]          │
//! │ cursor:        ^d           │      │ cursor:        ^e           │
//! └─────────────────────────────┘      └─────────────────────────────┘
//! ```
//!
//! At capacity the oldest entry is dropped and the cursor stays on the last
//! index rather than advancing past it. Undo depth shrinks by one per
//! steady-state push; the current entry is never displaced.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Configuration for the snapshot log.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of snapshots to retain. Oldest entries are evicted
    /// when a push would exceed this.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 50 }
    }
}

impl HistoryConfig {
    /// Create a configuration with a custom entry limit.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Create an unlimited configuration (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
        }
    }
}

/// Bounded linear undo/redo log of full-document snapshots.
pub struct SnapshotLog {
    /// Snapshots, oldest first.
    entries: VecDeque<Arc<str>>,
    /// Index of the current entry; `None` iff `entries` is empty.
    cursor: Option<usize>,
    config: HistoryConfig,
}

impl fmt::Debug for SnapshotLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotLog")
            .field("entries", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for SnapshotLog {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl SnapshotLog {
    /// Create an empty log with the given configuration.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            config,
        }
    }

    /// Rebuild a log from persisted parts.
    ///
    /// Entries beyond capacity are dropped from the front with the cursor
    /// shifted to match; a missing or out-of-range cursor is clamped into
    /// bounds rather than rejected. Persisted state is outside the crate's
    /// control, so this constructor never fails.
    #[must_use]
    pub fn restore(config: HistoryConfig, entries: Vec<String>, cursor: Option<usize>) -> Self {
        let mut entries: VecDeque<Arc<str>> =
            entries.into_iter().map(Arc::from).collect();
        let dropped = entries.len().saturating_sub(config.max_entries);
        for _ in 0..dropped {
            entries.pop_front();
        }
        let cursor = match entries.len() {
            0 => None,
            len => Some(
                cursor
                    .map_or(len - 1, |c| c.saturating_sub(dropped))
                    .min(len - 1),
            ),
        };
        Self {
            entries,
            cursor,
            config,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Append a snapshot, discarding the redo branch.
    ///
    /// Under capacity the cursor advances onto the new entry. At capacity the
    /// oldest entry is dropped instead and the cursor stays on the last
    /// index.
    pub fn push(&mut self, text: &str) {
        match self.cursor {
            Some(c) => self.entries.truncate(c + 1),
            None => self.entries.clear(),
        }
        self.entries.push_back(Arc::from(text));
        if self.entries.len() > self.config.max_entries {
            self.entries.pop_front();
            self.cursor = self.entries.len().checked_sub(1);
        } else {
            self.cursor = Some(self.cursor.map_or(0, |c| c + 1));
        }
        tracing::trace!(
            entries = self.entries.len(),
            cursor = ?self.cursor,
            "snapshot pushed"
        );
    }

    /// Step the cursor back and return the snapshot it now points at.
    ///
    /// Returns `None` at the start of history. A cursor pointing at a
    /// missing entry is treated as a no-op rather than a fault.
    pub fn undo(&mut self) -> Option<Arc<str>> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        let snapshot = self.entries.get(cursor - 1)?.clone();
        self.cursor = Some(cursor - 1);
        tracing::trace!(cursor = cursor - 1, "undo");
        Some(snapshot)
    }

    /// Step the cursor forward and return the snapshot it now points at.
    ///
    /// Returns `None` at the end of history.
    pub fn redo(&mut self) -> Option<Arc<str>> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        let snapshot = self.entries.get(cursor + 1)?.clone();
        self.cursor = Some(cursor + 1);
        tracing::trace!(cursor = cursor + 1, "redo");
        Some(snapshot)
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// The snapshot the cursor points at, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<str>> {
        self.entries.get(self.cursor?)
    }

    /// Cursor position, `None` when empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate snapshots oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.iter()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(log: &SnapshotLog) -> Vec<&str> {
        log.iter().map(|s| s.as_ref()).collect()
    }

    #[test]
    fn new_log_is_empty() {
        let log = SnapshotLog::default();
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);
        assert!(!log.can_undo());
        assert!(!log.can_redo());
        assert!(log.current().is_none());
    }

    #[test]
    fn push_sets_current() {
        let mut log = SnapshotLog::default();
        log.push("a");
        assert_eq!(log.current().map(|s| s.as_ref()), Some("a"));
        assert_eq!(log.cursor(), Some(0));
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn undo_steps_back_redo_steps_forward() {
        let mut log = SnapshotLog::default();
        log.push("a");
        log.push("b");
        log.push("c");

        assert_eq!(log.undo().as_deref(), Some("b"));
        assert_eq!(log.undo().as_deref(), Some("a"));
        assert_eq!(log.undo(), None);

        assert_eq!(log.redo().as_deref(), Some("b"));
        assert_eq!(log.redo().as_deref(), Some("c"));
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn bounds_queries_track_cursor() {
        let mut log = SnapshotLog::default();
        log.push("a");
        log.push("b");
        assert!(log.can_undo());
        assert!(!log.can_redo());

        log.undo();
        assert!(!log.can_undo());
        assert!(log.can_redo());
    }

    #[test]
    fn push_after_undo_truncates_redo_branch() {
        let mut log = SnapshotLog::default();
        log.push("a");
        log.push("b");
        log.push("c");
        log.undo();
        log.undo();
        log.push("d");

        assert_eq!(texts(&log), vec!["a", "d"]);
        assert_eq!(log.current().map(|s| s.as_ref()), Some("d"));
        assert_eq!(log.redo(), None);
    }

    #[test]
    fn capacity_drops_oldest_keeps_cursor_on_last() {
        let mut log = SnapshotLog::new(HistoryConfig::new(3));
        for t in ["a", "b", "c", "d"] {
            log.push(t);
        }
        assert_eq!(texts(&log), vec!["b", "c", "d"]);
        assert_eq!(log.cursor(), Some(2));
        assert_eq!(log.current().map(|s| s.as_ref()), Some("d"));
    }

    #[test]
    fn steady_state_at_capacity_never_displaces_current() {
        let mut log = SnapshotLog::new(HistoryConfig::new(2));
        for t in ["a", "b", "c", "d", "e"] {
            log.push(t);
        }
        assert_eq!(texts(&log), vec!["d", "e"]);
        assert_eq!(log.current().map(|s| s.as_ref()), Some("e"));
        assert_eq!(log.undo().as_deref(), Some("d"));
    }

    #[test]
    fn capacity_zero_retains_nothing() {
        let mut log = SnapshotLog::new(HistoryConfig::new(0));
        log.push("a");
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut log = SnapshotLog::default();
        log.push("a");
        log.push("b");
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);
        assert!(!log.can_undo());
    }

    #[test]
    fn restore_clamps_out_of_range_cursor() {
        let log = SnapshotLog::restore(
            HistoryConfig::default(),
            vec!["a".into(), "b".into()],
            Some(9),
        );
        assert_eq!(log.cursor(), Some(1));
        assert_eq!(log.current().map(|s| s.as_ref()), Some("b"));
    }

    #[test]
    fn restore_missing_cursor_defaults_to_last() {
        let log = SnapshotLog::restore(
            HistoryConfig::default(),
            vec!["a".into(), "b".into(), "c".into()],
            None,
        );
        assert_eq!(log.cursor(), Some(2));
    }

    #[test]
    fn restore_over_capacity_shifts_cursor() {
        let log = SnapshotLog::restore(
            HistoryConfig::new(2),
            vec!["a".into(), "b".into(), "c".into()],
            Some(2),
        );
        assert_eq!(texts(&log), vec!["b", "c"]);
        assert_eq!(log.cursor(), Some(1));
    }

    #[test]
    fn restore_empty_is_empty() {
        let log = SnapshotLog::restore(HistoryConfig::default(), Vec::new(), Some(3));
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);
    }

    #[test]
    fn debug_impl_reports_depth() {
        let mut log = SnapshotLog::default();
        log.push("a");
        let s = format!("{log:?}");
        assert!(s.contains("SnapshotLog"));
        assert!(s.contains("cursor"));
    }
}
