//! Text and value normalization applied around field matching.

use super::patterns::HYPHEN_SPACING;

/// Replace every line break (`\r\n`, `\n`, `\r`) with a single space.
pub fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Remove every occurrence of the given separator characters.
pub fn strip_separators(value: &str, separators: &[char]) -> String {
    value.chars().filter(|c| !separators.contains(c)).collect()
}

/// Collapse the spacing around the first hyphen: `"6297613 - M"` becomes `"6297613-M"`.
pub fn tighten_hyphen(value: &str) -> String {
    HYPHEN_SPACING.replace(value.trim(), "-").into_owned()
}

/// Remove hyphens and whitespace, leaving the bare identifier.
pub fn compact_identifier(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Split at a character count, returning the head and the (possibly empty) tail.
pub fn split_at_char(value: &str, count: usize) -> (String, String) {
    let head: String = value.chars().take(count).collect();
    let tail: String = value.chars().skip(count).collect();
    (head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_line_breaks() {
        assert_eq!(collapse_line_breaks("a\r\nb\nc\rd"), "a b c d");
    }

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("97.006.000", &['.', ' ']), "97006000");
    }

    #[test]
    fn test_tighten_hyphen() {
        assert_eq!(tighten_hyphen("6297613 - M"), "6297613-M");
        assert_eq!(tighten_hyphen("123906245-4"), "123906245-4");
    }

    #[test]
    fn test_compact_and_split() {
        assert_eq!(compact_identifier("LXW-J75 -4"), "LXWJ754");
        assert_eq!(
            split_at_char("LXWJ754", 6),
            ("LXWJ75".to_string(), "4".to_string())
        );
        assert_eq!(split_at_char("ÑXWJ7", 6), ("ÑXWJ7".to_string(), String::new()));
    }
}
