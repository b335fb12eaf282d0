//! The field matcher every extractor is built on.

use regex::Regex;

/// First capture group of the first match, trimmed.
///
/// Returns `None` when the pattern does not match or the group did not
/// participate in the match (or captured nothing).
pub fn find_field(text: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .filter(|m| !m.as_str().is_empty())
        .map(|m| m.as_str().trim().to_string())
}

/// Like [`find_field`], but absent values become an empty string.
pub fn find_or_empty(text: &str, pattern: &Regex) -> String {
    find_field(text, pattern).unwrap_or_default()
}
