//! Pair scoring configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Names accepted by [`ScoringConfig::from_preset`].
pub const PRESET_NAMES: &[&str] = &["strict", "balanced", "permissive"];

/// Points awarded per signal and the similarity cut-offs that trigger them.
///
/// The default is the production point table; changing it changes every
/// confidence the tool reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SignalPoints {
    /// Normalized first + last name identical
    pub full_name_exact: u32,
    pub first_name_high: u32,
    pub first_name_similar: u32,
    pub first_name_phonetic: u32,
    pub last_name_high: u32,
    pub last_name_similar: u32,
    pub last_name_phonetic: u32,
    pub display_name_high: u32,
    pub email_exact: u32,
    pub email_local_similar: u32,
    pub phone_exact: u32,
    /// First and last name swapped between the records
    pub name_inversion: u32,
    /// Known nickname pair with a near-identical last name
    pub nickname: u32,

    /// Edit-distance percentage for a "high match" (inclusive)
    pub high_cutoff: f64,
    /// Edit-distance percentage for a "similar" name (inclusive)
    pub similar_cutoff: f64,
    /// Cut-off for email local parts, inversions and nickname last names
    pub related_cutoff: f64,
}

impl Default for SignalPoints {
    fn default() -> Self {
        Self {
            full_name_exact: 50,
            first_name_high: 15,
            first_name_similar: 10,
            first_name_phonetic: 8,
            last_name_high: 20,
            last_name_similar: 12,
            last_name_phonetic: 10,
            display_name_high: 10,
            email_exact: 25,
            email_local_similar: 10,
            phone_exact: 20,
            name_inversion: 15,
            nickname: 12,
            high_cutoff: 90.0,
            similar_cutoff: 75.0,
            related_cutoff: 85.0,
        }
    }
}

/// Threshold plus point table used by the pair scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum confidence (0-100) for a pair to be reported
    pub threshold: u8,
    #[serde(default)]
    pub points: SignalPoints,
}

impl ScoringConfig {
    /// Only pairs with several corroborating signals
    #[must_use]
    pub fn strict() -> Self {
        Self {
            threshold: 75,
            points: SignalPoints::default(),
        }
    }

    /// General review queue
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            threshold: 50,
            points: SignalPoints::default(),
        }
    }

    /// Discovery mode; expect false positives
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            threshold: 30,
            points: SignalPoints::default(),
        }
    }

    /// Set a custom threshold. Values above 100 are clamped.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(100);
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: SignalPoints) -> Self {
        self.points = points;
        self
    }

    /// Create config from a preset name.
    ///
    /// Supported presets: "strict", "balanced", "permissive".
    #[must_use]
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "strict" => Some(Self::strict()),
            "balanced" | "default" => Some(Self::balanced()),
            "permissive" => Some(Self::permissive()),
            _ => None,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_table() {
        let points = SignalPoints::default();
        assert_eq!(points.full_name_exact, 50);
        assert_eq!(points.email_exact, 25);
        assert_eq!(points.phone_exact, 20);
        assert_eq!(points.nickname, 12);
        assert_eq!(points.high_cutoff, 90.0);
        assert_eq!(points.similar_cutoff, 75.0);
        assert_eq!(points.related_cutoff, 85.0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(ScoringConfig::from_preset("strict").map(|c| c.threshold), Some(75));
        assert_eq!(ScoringConfig::from_preset("Balanced").map(|c| c.threshold), Some(50));
        assert_eq!(ScoringConfig::from_preset("permissive").map(|c| c.threshold), Some(30));
        assert!(ScoringConfig::from_preset("lenient").is_none());
        for name in PRESET_NAMES {
            assert!(ScoringConfig::from_preset(name).is_some());
        }
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(ScoringConfig::default().with_threshold(250).threshold, 100);
    }

    #[test]
    fn test_partial_points_deserialize() {
        let points: SignalPoints =
            serde_yaml::from_str("phone_exact: 30\n").expect("valid yaml");
        assert_eq!(points.phone_exact, 30);
        assert_eq!(points.email_exact, 25);
    }
}
