#![forbid(unsafe_code)]

//! The built-in transform set.
//!
//! One-click formatting operations expressed as pure functions.
//! Line-oriented transforms split on `'\n'` (not `lines()`) so a trailing
//! newline survives as an empty last segment.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::registry::{TransformError, TransformRegistry};

/// Emoji blocks stripped by [`strip_emoji`].
const EMOJI_RANGES: [(u32, u32); 6] = [
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F680, 0x1F6FF), // transport
    (0x1F1E0, 0x1F1FF), // regional indicators
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
];

/// Register every built-in under its canonical name.
pub fn register_all(registry: &mut TransformRegistry) {
    registry.register("number-lines", number_lines);
    registry.register("strip-blank-lines", strip_blank_lines);
    registry.register("join-lines", join_lines);
    registry.register("collapse-whitespace", collapse_whitespace);
    registry.register("strip-emoji", strip_emoji);
    registry.register("uppercase", uppercase);
    registry.register("lowercase", lowercase);
    registry.register("sentence-case", sentence_case);
    registry.register("title-case", title_case);
    registry.register("base64-encode", base64_encode);
    registry.register("base64-decode", base64_decode);
    registry.register("json-pretty", json_pretty);
    registry.register("json-minify", json_minify);
}

/// Prefix each line with a 1-based number.
pub fn number_lines(input: &str) -> Result<String, TransformError> {
    let numbered: Vec<String> = input
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect();
    Ok(numbered.join("\n"))
}

/// Drop lines that are empty after trimming.
pub fn strip_blank_lines(input: &str) -> Result<String, TransformError> {
    let kept: Vec<&str> = input
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();
    Ok(kept.join("\n"))
}

/// Fold everything onto one line with single spaces.
pub fn join_lines(input: &str) -> Result<String, TransformError> {
    collapse_whitespace(&input.replace('\n', " "))
}

/// Collapse whitespace runs to a single space and trim the ends.
pub fn collapse_whitespace(input: &str) -> Result<String, TransformError> {
    Ok(input.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Remove characters in the common emoji blocks.
pub fn strip_emoji(input: &str) -> Result<String, TransformError> {
    Ok(input
        .chars()
        .filter(|&c| {
            let cp = c as u32;
            !EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
        })
        .collect())
}

pub fn uppercase(input: &str) -> Result<String, TransformError> {
    Ok(input.to_uppercase())
}

pub fn lowercase(input: &str) -> Result<String, TransformError> {
    Ok(input.to_lowercase())
}

/// Lowercase, then capitalize the first word character and any word
/// character following a period and whitespace.
///
/// Word characters are ASCII `[A-Za-z0-9_]`.
pub fn sentence_case(input: &str) -> Result<String, TransformError> {
    let lower = input.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut capitalize_next = true;
    let mut after_period = false;
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if capitalize_next {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            capitalize_next = false;
            after_period = false;
        } else if ch == '.' {
            out.push(ch);
            after_period = true;
            capitalize_next = false;
        } else if ch.is_whitespace() {
            out.push(ch);
            capitalize_next = after_period;
        } else {
            out.push(ch);
            after_period = false;
            capitalize_next = false;
        }
    }
    Ok(out)
}

/// Lowercase, then capitalize the first word character of every word.
pub fn title_case(input: &str) -> Result<String, TransformError> {
    let lower = input.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut prev_is_word = false;
    for ch in lower.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !prev_is_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    Ok(out)
}

/// Encode the text as standard-alphabet base64.
pub fn base64_encode(input: &str) -> Result<String, TransformError> {
    Ok(STANDARD.encode(input.as_bytes()))
}

/// Decode standard-alphabet base64 into UTF-8 text.
pub fn base64_decode(input: &str) -> Result<String, TransformError> {
    let bytes = STANDARD.decode(input)?;
    Ok(String::from_utf8(bytes)?)
}

/// Re-serialize JSON with two-space indentation.
pub fn json_pretty(input: &str) -> Result<String, TransformError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Re-serialize JSON with no insignificant whitespace.
pub fn json_minify(input: &str) -> Result<String, TransformError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&value)?)
}

// ============================================================================
// Tests
// ============================================================================
