//! Download-safe spreadsheet file names.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^\p{L}\p{N}\s\-_().]").unwrap();
    static ref TRAILING_A: Regex = Regex::new(r"\s+A$").unwrap();
}

const EXTENSION: &str = ".xlsx";

/// Strip accents and unsafe characters from a base name.
pub fn sanitize(name: &str) -> String {
    let unaccented: String = name
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    let replaced = UNSAFE_CHARS.replace_all(&unaccented, "_");
    TRAILING_A.replace(replaced.trim(), "").into_owned()
}

/// Sanitized, `.xlsx`-suffixed and percent-encoded file name.
///
/// Encoding leaves parentheses alone, like a browser's `encodeURIComponent`.
pub fn export_file_name(base: &str) -> String {
    let mut name = sanitize(base);
    if !name.ends_with(EXTENSION) {
        name.push_str(EXTENSION);
    }
    urlencoding::encode(&name)
        .replace("%28", "(")
        .replace("%29", ")")
}
