#![forbid(unsafe_code)]

//! Replacement over flat document text.
//!
//! [`replace_one`] splices into a single span; every other span's offsets
//! are stale afterwards, so callers re-run the find rather than patching the
//! set in place. [`replace_all`] rebuilds the whole document in one pass and
//! reports how many hits it replaced. In both modes an invalid regex fails
//! the call with zero mutation.
//!
//! Literal replace-all under case-insensitive matching is case-correct:
//! positions come from scanning the folded text, but splicing happens on the
//! original-case text at those positions.

use crate::find::{FindOptions, MatchSpan, SearchError, advance_one_char, build_regex};

/// Result of a whole-text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// The rewritten document.
    pub text: String,
    /// Number of hits replaced.
    pub count: usize,
}

/// Splice `replacement` into `span` of `text`.
///
/// A span that no longer fits the text (stale offsets, non-boundary ends)
/// leaves the document unchanged.
#[must_use]
pub fn replace_one(text: &str, span: &MatchSpan, replacement: &str) -> String {
    if span.start > span.end
        || span.end > text.len()
        || !text.is_char_boundary(span.start)
        || !text.is_char_boundary(span.end)
    {
        tracing::debug!(start = span.start, end = span.end, "stale span, no replacement");
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() - span.len() + replacement.len());
    out.push_str(&text[..span.start]);
    out.push_str(replacement);
    out.push_str(&text[span.end..]);
    out
}

/// Replace every match of `query` in `text`.
///
/// Literal mode scans non-overlapping hits left to right. Regex mode counts
/// matches in a pre-pass, then applies the compiled pattern's substitution
/// semantics, so `$1`-style capture references work in the replacement.
pub fn replace_all(
    text: &str,
    query: &str,
    replacement: &str,
    options: &FindOptions,
) -> Result<Replacement, SearchError> {
    if query.is_empty() {
        return Ok(Replacement {
            text: text.to_string(),
            count: 0,
        });
    }
    if options.regex {
        replace_all_regex(text, query, replacement, options.case_sensitive)
    } else {
        Ok(replace_all_literal(
            text,
            query,
            replacement,
            options.case_sensitive,
        ))
    }
}

fn replace_all_literal(
    text: &str,
    query: &str,
    replacement: &str,
    case_sensitive: bool,
) -> Replacement {
    let folded_text;
    let folded_query;
    let (hay, needle) = if case_sensitive {
        (text, query)
    } else {
        folded_text = text.to_ascii_lowercase();
        folded_query = query.to_ascii_lowercase();
        (folded_text.as_str(), folded_query.as_str())
    };

    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut last = 0;
    let mut start = 0;
    while let Some(pos) = hay[start..].find(needle) {
        let abs = start + pos;
        let end = abs + needle.len();
        out.push_str(&text[last..abs]);
        out.push_str(replacement);
        count += 1;
        last = end;
        start = end;
    }
    out.push_str(&text[last..]);
    Replacement { text: out, count }
}

fn replace_all_regex(
    text: &str,
    pattern: &str,
    replacement: &str,
    case_sensitive: bool,
) -> Result<Replacement, SearchError> {
    let re = build_regex(pattern, case_sensitive)?;

    // Pre-pass count with the zero-length-match guard; replace_all below
    // substitutes the same non-overlapping hits.
    let mut count = 0;
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = re.find(&text[pos..]) else {
            break;
        };
        count += 1;
        let end = pos + m.end();
        pos = if m.end() > m.start() {
            end
        } else {
            advance_one_char(text, end)
        };
    }

    let new_text = re.replace_all(text, replacement).into_owned();
    Ok(Replacement {
        text: new_text,
        count,
    })
}

// ============================================================================
// Tests
// ============================================================================
