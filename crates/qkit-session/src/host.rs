#![forbid(unsafe_code)]

//! Collaborator seams toward the host editor.
//!
//! The session never talks to a concrete editor widget. It reads and writes
//! the live document through [`DocumentHost`] and reports user-visible
//! status through [`Notifier`]; whichever visual editor mode the host is in
//! is its own business.

/// Read/write access to the live document text.
pub trait DocumentHost {
    /// The full current document.
    fn text(&self) -> String;
    /// Replace the full document.
    fn set_text(&mut self, text: &str);
}

/// Fire-and-forget user-visible status messages. Never affects control
/// flow.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Notifier that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}

/// In-memory document host backed by a plain string.
///
/// Useful for tests and for headless embedding where the "editor" is just a
/// buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferHost {
    text: String,
}

impl BufferHost {
    /// Create a host with initial content.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentHost for BufferHost {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
