#![forbid(unsafe_code)]

//! Named text transforms for QuillKit.
//!
//! A transform is a pure `&str -> Result<String, TransformError>` function
//! registered under a stable name. The session layer resolves names through
//! [`TransformRegistry`], which makes every operation-log entry statically
//! replayable: if a name was recorded, the registry can resolve it.
//!
//! Transforms never touch the document themselves; they compute a new text
//! and the caller decides what to do with it. A transform that rejects its
//! input (bad base64, bad JSON) fails that one call and nothing else.

pub mod builtins;
pub mod registry;

pub use registry::{TransformError, TransformFn, TransformRegistry};
