#![forbid(unsafe_code)]

//! Match scanning over flat document text.
//!
//! # Invariants
//!
//! 1. Spans are ordered by ascending `start`.
//! 2. `start < end` for every span except zero-length regex matches.
//! 3. Span offsets are char boundaries of the *original* text, in both
//!    case-sensitive and case-folded scans.
//! 4. Scanning always terminates: literal mode advances at least one
//!    character per hit, regex mode advances past the match or one
//!    character for a zero-length match, and collection stops at
//!    [`MATCH_CEILING`].

use regex_lite::{Regex, RegexBuilder};
use std::ops::Range;
use thiserror::Error;

/// Safety ceiling on the number of collected matches.
pub const MATCH_CEILING: usize = 10_000;

/// Errors from the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query was regex mode and the pattern failed to compile.
    #[error("invalid pattern: {message}")]
    InvalidPattern { message: String },
}

/// Options for find and replace operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Whether the query is a regular expression.
    pub regex: bool,
    /// Whether matching is case-sensitive.
    pub case_sensitive: bool,
}

impl FindOptions {
    /// Create options with default values: literal, case-insensitive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set regex mode.
    #[must_use]
    pub fn regex(mut self, value: bool) -> Self {
        self.regex = value;
        self
    }

    /// Set case sensitivity.
    #[must_use]
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }
}

/// One search hit: a half-open byte range `[start, end)` in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte offset of the start of the match.
    pub start: usize,
    /// Byte offset one past the end of the match.
    pub end: usize,
    /// The matched text.
    pub text: String,
}

impl MatchSpan {
    /// Create a new span.
    #[must_use]
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// The byte range of this span.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is zero-length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An ordered set of match spans plus a cursor for "find next" cycling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    spans: Vec<MatchSpan>,
    current: usize,
    truncated: bool,
}

impl MatchSet {
    fn new(spans: Vec<MatchSpan>, truncated: bool) -> Self {
        Self {
            spans,
            current: 0,
            truncated,
        }
    }

    /// All spans, ascending by start offset.
    #[must_use]
    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    /// The currently selected span, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&MatchSpan> {
        self.spans.get(self.current)
    }

    /// Index of the currently selected span.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Advance the selection, wrapping modulo the span count, and return
    /// the newly selected span. No-op on an empty set.
    pub fn cycle_next(&mut self) -> Option<&MatchSpan> {
        if self.spans.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.spans.len();
        self.spans.get(self.current)
    }

    /// Whether collection stopped at [`MATCH_CEILING`].
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Number of spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if the set holds no spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Find all matches of `query` in `text`.
///
/// An empty query yields an empty set. Regex mode reports a malformed
/// pattern as [`SearchError::InvalidPattern`] with zero matches collected.
pub fn find(text: &str, query: &str, options: &FindOptions) -> Result<MatchSet, SearchError> {
    if query.is_empty() {
        return Ok(MatchSet::default());
    }
    if options.regex {
        find_regex(text, query, options.case_sensitive)
    } else {
        Ok(find_literal(text, query, options.case_sensitive))
    }
}

/// Compile a pattern with the engine's flags.
pub(crate) fn build_regex(pattern: &str, case_sensitive: bool) -> Result<Regex, SearchError> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| SearchError::InvalidPattern {
            message: e.to_string(),
        })
}

/// Byte offset one character past `pos`, past the end when `pos` is at it.
pub(crate) fn advance_one_char(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Literal scan. Advances one character per hit, so matches may overlap.
fn find_literal(text: &str, query: &str, case_sensitive: bool) -> MatchSet {
    let folded_text;
    let folded_query;
    let (hay, needle) = if case_sensitive {
        (text, query)
    } else {
        // ASCII fold preserves byte offsets, so spans index the original.
        folded_text = text.to_ascii_lowercase();
        folded_query = query.to_ascii_lowercase();
        (folded_text.as_str(), folded_query.as_str())
    };

    let mut spans = Vec::new();
    let mut truncated = false;
    let mut start = 0;
    while let Some(pos) = hay[start..].find(needle) {
        let abs = start + pos;
        let end = abs + needle.len();
        spans.push(MatchSpan::new(abs, end, &text[abs..end]));
        if spans.len() >= MATCH_CEILING {
            truncated = true;
            tracing::debug!(ceiling = MATCH_CEILING, "literal scan hit match ceiling");
            break;
        }
        start = advance_one_char(hay, abs);
        if start > hay.len() {
            break;
        }
    }
    MatchSet::new(spans, truncated)
}

/// Regex scan. Advances past each match; a zero-length match forces the
/// position forward one character so the scan cannot loop.
fn find_regex(text: &str, pattern: &str, case_sensitive: bool) -> Result<MatchSet, SearchError> {
    let re = build_regex(pattern, case_sensitive)?;
    let mut spans = Vec::new();
    let mut truncated = false;
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = re.find(&text[pos..]) else {
            break;
        };
        let start = pos + m.start();
        let end = pos + m.end();
        spans.push(MatchSpan::new(start, end, &text[start..end]));
        if spans.len() >= MATCH_CEILING {
            truncated = true;
            tracing::debug!(ceiling = MATCH_CEILING, "regex scan hit match ceiling");
            break;
        }
        pos = if end > start {
            end
        } else {
            advance_one_char(text, end)
        };
    }
    Ok(MatchSet::new(spans, truncated))
}

// ============================================================================
// Tests
// ============================================================================
