#![forbid(unsafe_code)]

//! The editing session: one owner for history, operations, and matches.
//!
//! # Invariants
//!
//! 1. A successful transform pushes exactly two snapshots (before, after)
//!    and records its name once; a failed transform pushes and records
//!    nothing.
//! 2. While `phase` is [`ReplayPhase::ReplayingUndo`] no snapshot can be
//!    pushed; the history never records its own replayed output.
//! 3. While `phase` is [`ReplayPhase::ReplayingOperation`] history pushes
//!    proceed normally but the operation log membership is frozen.
//! 4. A replace pushes exactly one snapshot and invalidates the match set.
//! 5. Storage writes are best-effort: a failure is logged and the in-memory
//!    state it mirrors is kept.

use qkit_history::persist::{self, StateStore};
use qkit_history::{HistoryConfig, OperationLog, SnapshotLog};
use qkit_search::{FindOptions, MatchSet, MatchSpan, SearchError};
use qkit_transforms::{TransformError, TransformRegistry};
use thiserror::Error;

use crate::host::{DocumentHost, Notifier, NullNotifier};

/// Storage key for the snapshot log blob.
pub const HISTORY_KEY: &str = "quillkit.history";
/// Storage key for the operation log blob.
pub const OPERATIONS_KEY: &str = "quillkit.operations";

/// What kind of programmatic replay, if any, is in progress.
///
/// A single enum rather than two boolean reentrancy flags: the states are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayPhase {
    /// Normal user-driven editing.
    #[default]
    Idle,
    /// An undo/redo snapshot is being applied to the host.
    ReplayingUndo,
    /// A logged operation is being re-invoked.
    ReplayingOperation,
}

/// Errors surfaced to the calling UI layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown transform '{0}'")]
    UnknownTransform(String),
    #[error("operation '{0}' is not in the log")]
    OperationNotFound(String),
    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Single-threaded editing session over a host document.
pub struct EditorSession {
    host: Box<dyn DocumentHost>,
    store: Box<dyn StateStore>,
    notifier: Box<dyn Notifier>,
    registry: TransformRegistry,
    history: SnapshotLog,
    operations: OperationLog,
    matches: Option<MatchSet>,
    last_query: Option<(String, FindOptions)>,
    phase: ReplayPhase,
}

impl EditorSession {
    /// Create a session with the built-in transforms, default limits, a
    /// silent notifier, and empty logs. Call [`hydrate`](Self::hydrate) to
    /// pick up a previous session's state.
    #[must_use]
    pub fn new(host: Box<dyn DocumentHost>, store: Box<dyn StateStore>) -> Self {
        Self {
            host,
            store,
            notifier: Box::new(NullNotifier),
            registry: TransformRegistry::with_builtins(),
            history: SnapshotLog::default(),
            operations: OperationLog::default(),
            matches: None,
            last_query: None,
            phase: ReplayPhase::Idle,
        }
    }

    /// Replace the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the transform registry.
    #[must_use]
    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use a custom history capacity. Discards any current history.
    #[must_use]
    pub fn with_history_config(mut self, config: HistoryConfig) -> Self {
        self.history = SnapshotLog::new(config);
        self
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Load both logs from the store. Missing or unreadable blobs leave the
    /// empty state in place.
    pub fn hydrate(&mut self) {
        match persist::load_history(
            self.store.as_ref(),
            HISTORY_KEY,
            self.history.config().clone(),
        ) {
            Ok(Some(log)) => self.history = log,
            Ok(None) => {}
            Err(e) => tracing::warn!(key = HISTORY_KEY, error = %e, "history load failed"),
        }
        match persist::load_operations(
            self.store.as_ref(),
            OPERATIONS_KEY,
            self.operations.capacity(),
        ) {
            Ok(Some(log)) => self.operations = log,
            Ok(None) => {}
            Err(e) => tracing::warn!(key = OPERATIONS_KEY, error = %e, "operations load failed"),
        }
    }

    /// Push the host's current text as the initial snapshot, once.
    ///
    /// No-op when history already holds entries (fresh or hydrated).
    pub fn seed(&mut self) {
        if self.history.is_empty() {
            let text = self.host.text();
            self.history.push(&text);
            self.persist_history();
        }
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Apply a named transform to the whole document.
    ///
    /// On success this pushes the before and after snapshots, records the
    /// name (outside replay), and persists. On failure the document,
    /// history, and operation log are all left untouched.
    pub fn apply(&mut self, name: &str) -> Result<(), SessionError> {
        let Some(transform) = self.registry.get(name).cloned() else {
            self.notifier.notify(&format!("unknown operation: {name}"));
            return Err(SessionError::UnknownTransform(name.to_string()));
        };
        let before = self.host.text();
        let after = match transform(&before) {
            Ok(after) => after,
            Err(e) => {
                self.notifier.notify(&format!("{name} failed: {e}"));
                return Err(e.into());
            }
        };
        tracing::debug!(name, phase = ?self.phase, "applying transform");
        self.push_snapshot(&before);
        self.host.set_text(&after);
        self.push_snapshot(&after);
        if self.phase == ReplayPhase::Idle {
            self.operations.record(name);
            self.persist_operations();
        }
        self.persist_history();
        Ok(())
    }

    /// Register an additional transform on this session's registry.
    pub fn register_transform<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        self.registry.register(name, transform);
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    /// Step the document back one snapshot. No-op at the start of history.
    pub fn undo(&mut self) {
        if !self.history.can_undo() {
            return;
        }
        self.phase = ReplayPhase::ReplayingUndo;
        if let Some(snapshot) = self.history.undo() {
            self.host.set_text(&snapshot);
        }
        self.phase = ReplayPhase::Idle;
        self.persist_history();
    }

    /// Step the document forward one snapshot. No-op at the end of history.
    pub fn redo(&mut self) {
        if !self.history.can_redo() {
            return;
        }
        self.phase = ReplayPhase::ReplayingUndo;
        if let Some(snapshot) = self.history.redo() {
            self.host.set_text(&snapshot);
        }
        self.phase = ReplayPhase::Idle;
        self.persist_history();
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========================================================================
    // Operation replay
    // ========================================================================

    /// Re-invoke a logged operation by name.
    ///
    /// The transform runs exactly as a live invocation, including both
    /// history pushes, but the operation log membership stays unchanged.
    pub fn replay(&mut self, name: &str) -> Result<(), SessionError> {
        if !self.operations.contains(name) {
            self.notifier.notify(&format!("operation not found: {name}"));
            return Err(SessionError::OperationNotFound(name.to_string()));
        }
        self.phase = ReplayPhase::ReplayingOperation;
        let result = self.apply(name);
        self.phase = ReplayPhase::Idle;
        result
    }

    /// Replay every logged operation, oldest first.
    ///
    /// Each replay is independent; one failing transform is reported and the
    /// rest still run.
    pub fn replay_all(&mut self) {
        let names: Vec<String> = self
            .operations
            .names_oldest_first()
            .map(String::from)
            .collect();
        for name in names {
            // Failures are already notified; keep going.
            let _ = self.replay(&name);
        }
    }

    /// Remove one operation record (0 = newest). Out of range is a no-op.
    pub fn remove_operation(&mut self, index: usize) {
        self.operations.remove(index);
        self.persist_operations();
    }

    /// Drop all operation records.
    pub fn clear_operations(&mut self) {
        self.operations.clear();
        self.persist_operations();
    }

    // ========================================================================
    // Find / replace
    // ========================================================================

    /// Scan the current document and remember the resulting match set.
    ///
    /// Returns the number of matches. An invalid pattern is notified and
    /// returned as an error; the previous match set is kept, per the
    /// engine's leave-unchanged contract.
    pub fn find(&mut self, query: &str, options: &FindOptions) -> Result<usize, SessionError> {
        let text = self.host.text();
        match qkit_search::find(&text, query, options) {
            Ok(set) => {
                if set.truncated() {
                    self.notifier
                        .notify("too many matches; stopped at the safety ceiling");
                }
                let count = set.len();
                self.last_query = Some((query.to_string(), options.clone()));
                self.matches = Some(set);
                Ok(count)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Advance the match selection, wrapping at the end.
    ///
    /// On an empty or absent set this re-runs the last find first.
    pub fn find_next(&mut self) -> Option<MatchSpan> {
        let needs_refind = self.matches.as_ref().is_none_or(MatchSet::is_empty);
        if needs_refind {
            let (query, options) = self.last_query.clone()?;
            if self.find(&query, &options).ok()? == 0 {
                return None;
            }
            return self.matches.as_ref().and_then(MatchSet::selected).cloned();
        }
        self.matches.as_mut().and_then(|s| s.cycle_next()).cloned()
    }

    /// The current match set, if a find has run.
    #[must_use]
    pub fn matches(&self) -> Option<&MatchSet> {
        self.matches.as_ref()
    }

    /// Replace the currently selected match.
    ///
    /// Pushes one snapshot and invalidates the match set; re-run
    /// [`find`](Self::find) for fresh offsets. Returns whether a replacement
    /// happened.
    pub fn replace_current(&mut self, replacement: &str) -> bool {
        let Some(span) = self.matches.as_ref().and_then(MatchSet::selected).cloned() else {
            return false;
        };
        let before = self.host.text();
        let after = qkit_search::replace_one(&before, &span, replacement);
        self.host.set_text(&after);
        self.push_snapshot(&after);
        self.matches = None;
        self.persist_history();
        true
    }

    /// Replace every match of `query` in the document.
    ///
    /// Pushes one snapshot when anything changed. Returns the replacement
    /// count; an invalid pattern leaves the document byte-for-byte
    /// unchanged.
    pub fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        options: &FindOptions,
    ) -> Result<usize, SessionError> {
        let before = self.host.text();
        match qkit_search::replace_all(&before, query, replacement, options) {
            Ok(result) => {
                if result.count > 0 {
                    self.host.set_text(&result.text);
                    self.push_snapshot(&result.text);
                    self.persist_history();
                }
                self.matches = None;
                Ok(result.count)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string());
                Err(e.into())
            }
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// The live document text.
    #[must_use]
    pub fn text(&self) -> String {
        self.host.text()
    }

    /// The snapshot log.
    #[must_use]
    pub fn history(&self) -> &SnapshotLog {
        &self.history
    }

    /// The operation log.
    #[must_use]
    pub fn operations(&self) -> &OperationLog {
        &self.operations
    }

    /// The transform registry.
    #[must_use]
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// The current replay phase.
    #[must_use]
    pub fn phase(&self) -> ReplayPhase {
        self.phase
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Push a snapshot unless an undo/redo replay is applying its own
    /// output.
    fn push_snapshot(&mut self, text: &str) {
        if self.phase == ReplayPhase::ReplayingUndo {
            return;
        }
        self.history.push(text);
    }

    fn persist_history(&mut self) {
        if let Err(e) = persist::save_history(self.store.as_mut(), HISTORY_KEY, &self.history) {
            tracing::warn!(key = HISTORY_KEY, error = %e, "history write failed");
        }
    }

    fn persist_operations(&mut self) {
        if let Err(e) =
            persist::save_operations(self.store.as_mut(), OPERATIONS_KEY, &self.operations)
        {
            tracing::warn!(key = OPERATIONS_KEY, error = %e, "operations write failed");
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("history", &self.history)
            .field("operations", &self.operations.len())
            .field("matches", &self.matches.as_ref().map(MatchSet::len))
            .field("phase", &self.phase)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
