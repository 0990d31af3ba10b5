//! # Text Processing Utilities
//!
//! Helpers for normalising user text before it reaches the model, cheap
//! keyword detection for the local workflow steps, and making strings safe
//! to put in a log line.

use once_cell::sync::Lazy;
use regex::Regex;

const REDACTED: &str = "[REDACTED]";
const ELLIPSIS: &str = "…";

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Authorization headers, keep the header name.
        r"(?i)(authorization:\s*)(bearer\s+)?([\w\-\.=:/+]+)",
        // KEY=value style assignments, keep the variable name.
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
        // Provider API keys quoted inline.
        r"(gsk_)[A-Za-z0-9]{16,}",
        r"(sk-)[A-Za-z0-9\-_]{16,}",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// # Example
/// ```rust
/// use bragi_util::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Team decided\n\tto ship.  "), "Team decided to ship.");
/// ```
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of characters left after trimming surrounding whitespace.
pub fn trimmed_char_count(input: &str) -> usize {
    input.trim().chars().count()
}

/// Returns true when any keyword occurs in `haystack`, ignoring case.
///
/// Matching is plain substring search, so `"now"` also matches `"known"`.
pub fn contains_any_keyword(haystack: &str, keywords: &[&str]) -> bool {
    let lowered = haystack.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(&keyword.to_lowercase()))
}

/// Shorten text for a log line, cutting on a character boundary.
pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut truncated: String = input.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Redacts values that look like secrets in a string.
///
/// Header names and variable names are preserved so the line is still useful
/// for debugging.
///
/// # Example
/// ```rust
/// use bragi_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("GROQ_API_KEY=abc123"), "GROQ_API_KEY=[REDACTED]");
/// assert_eq!(redact_sensitive("Authorization: Bearer secret123"), "Authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REDACTED}")
            })
            .into_owned();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_handles_mixed_runs() {
        assert_eq!(
            collapse_whitespace("  Team decided to ship Friday.   Alice owns QA.  "),
            "Team decided to ship Friday. Alice owns QA."
        );
        assert_eq!(collapse_whitespace("a\r\n\r\nb\u{00a0}c"), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn keyword_detection_ignores_case() {
        assert!(contains_any_keyword("This is URGENT", &["urgent", "asap"]));
        assert!(contains_any_keyword("I know", &["now"]));
        assert!(!contains_any_keyword("calm note", &["angry", "hate"]));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_for_log("héllo wörld", 5), "héllo…");
        assert_eq!(truncate_for_log("short", 10), "short");
    }

    #[test]
    fn redaction_hides_provider_keys() {
        let line = "calling with key gsk_abcdefghijklmnopqrstuvwx";
        assert_eq!(redact_sensitive(line), "calling with key gsk_[REDACTED]");
        assert_eq!(redact_sensitive("token=abc password=hunter2"), "token=[REDACTED] password=[REDACTED]");
        assert_eq!(redact_sensitive("nothing secret here"), "nothing secret here");
    }
}
