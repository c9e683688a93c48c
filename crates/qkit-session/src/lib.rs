#![forbid(unsafe_code)]

//! Editing session for QuillKit.
//!
//! [`EditorSession`] is the single owner of the editing core's state: the
//! snapshot undo/redo log, the operation log, the transform registry, and
//! the current find/replace match set. UI event handlers call into it
//! synchronously; every call runs to completion before control returns.
//!
//! # Control flow
//!
//! ```text
//! button click ──► apply("uppercase")
//!                    │ resolve transform, run it on current text
//!                    │ push(before) ─ set_text(new) ─ push(after)
//!                    │ record("uppercase") unless replaying
//!                    └ persist history + operations (best-effort)
//!
//! undo click  ──► undo()
//!                    │ phase = ReplayingUndo   (pushes suppressed)
//!                    │ set_text(snapshot)
//!                    └ phase = Idle, persist
//! ```
//!
//! The host editor, durable storage, and the status line are reached
//! through the [`DocumentHost`], [`StateStore`](qkit_history::StateStore)
//! and [`Notifier`] seams, so the core stays testable without any UI.

pub mod host;
pub mod session;

pub use host::{BufferHost, DocumentHost, Notifier, NullNotifier};
pub use session::{EditorSession, ReplayPhase, SessionError};
