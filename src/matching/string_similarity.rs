//! String similarity signals for name comparison.
//!
//! Every comparison yields four independent signals: a length-normalized
//! Levenshtein percentage, a character-overlap percentage with the exact
//! semantics of PHP's `similar_text`, and Soundex / Metaphone equality.

use super::normalize::normalize_name;
use super::phonetic::{metaphone, soundex};
use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Similarity signals for one pair of strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// `(1 - levenshtein / max_len) * 100`, rounded to two decimals
    pub edit_distance_pct: f64,
    /// `similar_text` percentage, 0-100
    pub overlap_pct: f64,
    pub soundex_equal: bool,
    pub metaphone_equal: bool,
}

impl SimilarityResult {
    /// The result for a comparison where either side is empty.
    pub const ZERO: Self = Self {
        edit_distance_pct: 0.0,
        overlap_pct: 0.0,
        soundex_equal: false,
        metaphone_equal: false,
    };
}

/// A normalized string with its phonetic codes computed once.
///
/// Records are compared against many others in a batch; keeping the key
/// avoids re-normalizing and re-encoding on every pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameKey {
    normalized: String,
    soundex: String,
    metaphone: String,
}

impl NameKey {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize_name(raw);
        let soundex = soundex(&normalized);
        let metaphone = metaphone(&normalized);
        Self {
            normalized,
            soundex,
            metaphone,
        }
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Compute all four similarity signals against another key.
    #[must_use]
    pub fn compare(&self, other: &Self) -> SimilarityResult {
        if self.is_empty() || other.is_empty() {
            return SimilarityResult::ZERO;
        }
        SimilarityResult {
            edit_distance_pct: edit_distance_pct(&self.normalized, &other.normalized),
            overlap_pct: similar_text_pct(&self.normalized, &other.normalized),
            soundex_equal: self.soundex == other.soundex,
            metaphone_equal: self.metaphone == other.metaphone,
        }
    }
}

/// Compare two raw strings. Both sides are normalized first.
///
/// ```
/// use person_dedupe::matching::similarity;
///
/// let result = similarity("Jon", "John");
/// assert_eq!(result.edit_distance_pct, 75.0);
/// assert!(result.metaphone_equal);
/// assert_eq!(similarity("", "John").edit_distance_pct, 0.0);
/// ```
#[must_use]
pub fn similarity(a: &str, b: &str) -> SimilarityResult {
    NameKey::new(a).compare(&NameKey::new(b))
}

/// Length-normalized Levenshtein similarity in percent, rounded to two decimals.
///
/// Returns 0 when either string is empty.
#[must_use]
pub fn edit_distance_pct(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if a.is_empty() || b.is_empty() || max_len == 0 {
        return 0.0;
    }
    let distance = levenshtein(a, b) as f64;
    round2((1.0 - distance / max_len as f64) * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Number of matching characters as counted by PHP's `similar_text`.
///
/// Finds the first longest common substring, then recurses into the
/// remainders on its left and right. The left recursion only runs when
/// both prefixes are non-empty and the scan improved its best match more
/// than once, which is a quirk of the reference implementation.
#[must_use]
pub fn similar_text(a: &str, b: &str) -> usize {
    similar_chars(a.as_bytes(), b.as_bytes())
}

/// `similar_text` as a percentage of the average length of both strings.
#[must_use]
pub fn similar_text_pct(a: &str, b: &str) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    similar_text(a, b) as f64 * 200.0 / total as f64
}

fn similar_chars(a: &[u8], b: &[u8]) -> usize {
    let common = longest_common_substring(a, b);
    if common.len == 0 {
        return 0;
    }

    let mut sum = common.len;
    if common.pos_a > 0 && common.pos_b > 0 && common.improvements > 1 {
        sum += similar_chars(&a[..common.pos_a], &b[..common.pos_b]);
    }
    let end_a = common.pos_a + common.len;
    let end_b = common.pos_b + common.len;
    if end_a < a.len() && end_b < b.len() {
        sum += similar_chars(&a[end_a..], &b[end_b..]);
    }
    sum
}

struct CommonSubstring {
    pos_a: usize,
    pos_b: usize,
    len: usize,
    improvements: usize,
}

/// First-found longest common substring, scanning `a` then `b` left to right.
fn longest_common_substring(a: &[u8], b: &[u8]) -> CommonSubstring {
    let mut best = CommonSubstring {
        pos_a: 0,
        pos_b: 0,
        len: 0,
        improvements: 0,
    };
    for i in 0..a.len() {
        for j in 0..b.len() {
            let len = a[i..]
                .iter()
                .zip(&b[j..])
                .take_while(|(x, y)| x == y)
                .count();
            if len > best.len {
                best.len = len;
                best.improvements += 1;
                best.pos_a = i;
                best.pos_b = j;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_identical() {
        assert_eq!(edit_distance_pct("robert", "robert"), 100.0);
    }

    #[test]
    fn test_edit_distance_rounding() {
        // 1 edit over 3 chars = 66.666...
        assert_eq!(edit_distance_pct("bob", "rob"), 66.67);
        assert_eq!(edit_distance_pct("jon", "john"), 75.0);
    }

    #[test]
    fn test_edit_distance_empty() {
        assert_eq!(edit_distance_pct("", "abc"), 0.0);
        assert_eq!(edit_distance_pct("", ""), 0.0);
    }

    #[test]
    fn test_similar_text_matches_php() {
        // Reference values from PHP's similar_text()
        assert_eq!(similar_text("World", "Word"), 4);
        assert_eq!(similar_text("robert", "rupert"), 4);
        // The first "l" is found first; the "o" lies left of it in one string only
        assert_eq!(similar_text("hello", "world"), 1);
        assert_eq!(similar_text("", "abc"), 0);
    }

    #[test]
    fn test_similar_text_pct() {
        let pct = similar_text_pct("World", "Word");
        assert!((pct - 88.888_888).abs() < 1e-4, "pct={pct}");
        assert_eq!(similar_text_pct("abc", "abc"), 100.0);
        assert_eq!(similar_text_pct("", ""), 0.0);
    }

    #[test]
    fn test_similarity_normalizes_inputs() {
        let result = similarity("  O'Neil ", "oneil");
        assert_eq!(result.edit_distance_pct, 100.0);
        assert_eq!(result.overlap_pct, 100.0);
        assert!(result.soundex_equal);
        assert!(result.metaphone_equal);
    }

    #[test]
    fn test_similarity_zero_guard() {
        assert_eq!(similarity("", "anything"), SimilarityResult::ZERO);
        assert_eq!(similarity("anything", ""), SimilarityResult::ZERO);
        // Punctuation-only normalizes to empty
        assert_eq!(similarity("...", "anything"), SimilarityResult::ZERO);
    }

    #[test]
    fn test_signals_are_independent() {
        // Phonetically equal, textually distant
        let result = similarity("Catherine", "Kathryn");
        assert!(result.metaphone_equal);
        assert!(result.edit_distance_pct < 75.0);
    }

    #[test]
    fn test_name_key_reuse() {
        let key = NameKey::new("Smith");
        assert_eq!(key.normalized(), "smith");
        assert_eq!(key.compare(&NameKey::new("SMITH")).edit_distance_pct, 100.0);
        assert!(NameKey::new("").is_empty());
    }
}
