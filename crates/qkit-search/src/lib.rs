#![forbid(unsafe_code)]

//! Find/replace match engine for QuillKit.
//!
//! Given flat document text and a query (literal or regex), this crate
//! produces an ordered set of match spans and performs single or whole-text
//! replacement. Offsets are byte offsets into the document string, never
//! line/column pairs.
//!
//! Two scanning policies coexist deliberately:
//!
//! - **Literal mode** advances one character after each hit, so matches may
//!   overlap (`"aa"` in `"aaaa"` yields three matches). Overlapping-pattern
//!   searches depend on this policy; do not "fix" it to skip past hits.
//! - **Regex mode** advances past each match, stepping one character only on
//!   a zero-length match so patterns like `(a*)` always terminate. The
//!   number of collected spans is capped at [`MATCH_CEILING`]; hitting the
//!   cap is reported via [`MatchSet::truncated`], not an error.
//!
//! A malformed regex is the only error: the call fails with
//! [`SearchError::InvalidPattern`] and the document is untouched. "No
//! matches" is an empty set, never an error.

pub mod find;
pub mod replace;

pub use find::{FindOptions, MATCH_CEILING, MatchSet, MatchSpan, SearchError, find};
pub use replace::{Replacement, replace_all, replace_one};
