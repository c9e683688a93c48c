#![forbid(unsafe_code)]

//! Undo/redo history and operation-log state for QuillKit.
//!
//! This crate holds the two stateful subsystems of the editing core:
//!
//! - [`SnapshotLog`]: a bounded linear log of full-document snapshots with a
//!   single cursor, backing undo/redo.
//! - [`OperationLog`]: the last few *named* operations the user applied,
//!   deduplicated by name and ordered most-recent-first, replayable through
//!   the transform registry.
//!
//! Both are plain data structures: they never touch the live document and
//! never perform I/O on their own. Applying snapshots to a host editor and
//! persisting state through a [`StateStore`] are the session layer's job,
//! which keeps suppression rules and storage policy in one owner.
//!
//! # How it fits in the system
//! `qkit-session` owns one of each, mutates them from UI-driven calls, and
//! round-trips them through [`persist`] on every mutation. Nothing here is
//! shared or concurrent; all access is single-threaded and synchronous.

pub mod operation_log;
pub mod persist;
pub mod snapshot_log;

pub use operation_log::{DEFAULT_OPERATION_CAPACITY, OperationLog, OperationRecord};
pub use persist::{FileStore, MemoryStore, StateStore, StorageError};
pub use snapshot_log::{HistoryConfig, SnapshotLog};
