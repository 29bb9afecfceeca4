//! Name canonicalization applied before every string comparison.

use regex::Regex;
use std::sync::LazyLock;

static NON_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9\s]").expect("static pattern is valid")
});

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

/// Normalize a display or legal name for comparison.
///
/// Lowercases, drops everything except `a-z`, `0-9` and whitespace
/// (accented letters are dropped, not folded), collapses whitespace runs
/// to one space and trims.
///
/// ```
/// use person_dedupe::matching::normalize_name;
///
/// assert_eq!(normalize_name("  O'Brien-Smith,  Jr. "), "obriensmith jr");
/// assert_eq!(normalize_name(""), "");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lowered = name.to_lowercase();
    let stripped = NON_NAME_CHARS.replace_all(&lowered, "");
    WHITESPACE_RUNS
        .replace_all(stripped.trim(), " ")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize_name("Mary-Jane"), "maryjane");
        assert_eq!(normalize_name("J.R.R. Tolkien"), "jrr tolkien");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_name("  Ann \t\n  Lee  "), "ann lee");
    }

    #[test]
    fn test_drops_diacritics() {
        assert_eq!(normalize_name("José"), "jos");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize_name("Agent 007"), "agent 007");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name(" -- "), "");
    }
}
