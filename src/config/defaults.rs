//! Default configurations and presets.

use super::types::{AppConfig, BehaviorConfig, MatchingConfig, OutputConfig};
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Balanced settings suitable for a review queue
    Default,
    /// Only pairs with several corroborating signals
    Strict,
    /// Low threshold for discovery
    Permissive,
    /// JSON output, quiet, fail when matches exist
    CiCd,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Permissive => "permissive",
            Self::CiCd => "ci-cd",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" => Some(Self::Strict),
            "permissive" | "loose" => Some(Self::Permissive),
            "ci-cd" | "ci" | "pipeline" => Some(Self::CiCd),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Threshold 50, suitable for a manual review queue",
            Self::Strict => "Threshold 75, only well-corroborated duplicates",
            Self::Permissive => "Threshold 30, surfaces weak candidates too",
            Self::CiCd => "Machine-readable output that fails when duplicates exist",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Permissive, Self::CiCd]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::with_scoring_preset("strict"),
            ConfigPreset::Permissive => Self::with_scoring_preset("permissive"),
            ConfigPreset::CiCd => Self::ci_cd_preset(),
        }
    }

    fn with_scoring_preset(name: &str) -> Self {
        Self {
            matching: MatchingConfig {
                preset: name.to_string(),
                ..MatchingConfig::default()
            },
            ..Self::default()
        }
    }

    /// CI/CD pipeline preset.
    ///
    /// - JSON output for machine parsing
    /// - Fail when any duplicate is found
    /// - Quiet mode to reduce noise
    #[must_use]
    pub fn ci_cd_preset() -> Self {
        Self {
            output: OutputConfig {
                format: ReportFormat::Json,
                no_color: true,
                ..OutputConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_match: true,
                quiet: true,
            },
            ..Self::default()
        }
    }
}

// ============================================================================
// Default Value Constants
// ============================================================================

/// Scoring preset used when none is configured.
pub const DEFAULT_PRESET: &str = "balanced";

/// Pairs scored per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(ConfigPreset::from_name("balanced"), Some(ConfigPreset::Default));
        assert_eq!(ConfigPreset::from_name("STRICT"), Some(ConfigPreset::Strict));
        assert_eq!(ConfigPreset::from_name("pipeline"), Some(ConfigPreset::CiCd));
        assert_eq!(ConfigPreset::from_name("invalid"), None);
    }

    #[test]
    fn test_presets_resolve_thresholds() {
        assert_eq!(AppConfig::from_preset(ConfigPreset::Default).scoring_config().threshold, 50);
        assert_eq!(AppConfig::from_preset(ConfigPreset::Strict).scoring_config().threshold, 75);
        assert_eq!(AppConfig::from_preset(ConfigPreset::Permissive).scoring_config().threshold, 30);
    }

    #[test]
    fn test_ci_cd_preset() {
        let config = AppConfig::ci_cd_preset();
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.behavior.fail_on_match);
        assert!(config.behavior.quiet);
        assert!(config.output.no_color);
    }

    #[test]
    fn test_all_presets() {
        assert_eq!(ConfigPreset::all().len(), 4);
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
    }
}
