#![forbid(unsafe_code)]

//! Name → transform lookup table.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::builtins;

/// Errors a transform can report for malformed input.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("input is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("input is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("decoded bytes are not valid UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// A registered transform: pure text in, text out.
pub type TransformFn = Arc<dyn Fn(&str) -> Result<String, TransformError> + Send + Sync>;

/// Table from operation name to transform.
///
/// Names are exact and case-sensitive. Registering an existing name
/// replaces the previous transform.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    table: BTreeMap<String, TransformFn>,
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("names", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TransformRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry populated with the built-in transforms.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register a transform under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        self.table.insert(name.into(), Arc::new(transform));
    }

    /// Look up a transform by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TransformFn> {
        self.table.get(name)
    }

    /// Check whether a name resolves.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Number of registered transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
