//! Configuration types for person-dedupe scans.

use super::defaults::{DEFAULT_CHUNK_SIZE, DEFAULT_PRESET};
use crate::batch::{BatchOptions, CompareMode};
use crate::matching::{ScoringConfig, SignalPoints};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Scoring configuration (preset, threshold, point table)
    pub matching: MatchingConfig,
    /// Chunking and resume settings
    pub batch: BatchConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the scoring preset.
    pub fn preset(mut self, preset: impl Into<String>) -> Self {
        self.config.matching.preset = preset.into();
        self
    }

    /// Set a custom threshold (overrides the preset).
    pub const fn threshold(mut self, threshold: u32) -> Self {
        self.config.matching.threshold = Some(threshold);
        self
    }

    pub const fn exclude_same_id(mut self, exclude: bool) -> Self {
        self.config.matching.exclude_same_id = exclude;
        self
    }

    pub const fn mode(mut self, mode: CompareMode) -> Self {
        self.config.batch.mode = mode;
        self
    }

    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.batch.chunk_size = chunk_size;
        self
    }

    /// Set the state file used to resume interrupted scans.
    pub fn state_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.batch.state_file = path;
        self
    }

    pub const fn time_budget_secs(mut self, secs: Option<u64>) -> Self {
        self.config.batch.time_budget_secs = secs;
        self
    }

    pub const fn max_chunks(mut self, max: Option<usize>) -> Self {
        self.config.batch.max_chunks = max;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Exit with code 1 when any match is reported.
    pub const fn fail_on_match(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_match = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Types
// ============================================================================

/// Pair scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Scoring preset name: strict, balanced, permissive
    pub preset: String,
    /// Custom minimum confidence 0-100 (overrides preset)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0, max = 100))]
    pub threshold: Option<u32>,
    /// Point table and similarity cut-offs
    pub points: SignalPoints,
    /// Skip pairs whose records share an id
    pub exclude_same_id: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            threshold: None,
            points: SignalPoints::default(),
            exclude_same_id: false,
        }
    }
}

impl MatchingConfig {
    /// Resolve the preset and overrides into a [`ScoringConfig`].
    #[must_use]
    pub fn to_scoring_config(&self) -> ScoringConfig {
        let mut config = ScoringConfig::from_preset(&self.preset).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown scoring preset '{}', using 'balanced'. Valid: strict, balanced, permissive",
                self.preset
            );
            ScoringConfig::balanced()
        });

        if let Some(threshold) = self.threshold {
            config = config.with_threshold(u8::try_from(threshold.min(100)).unwrap_or(100));
        }

        config.with_points(self.points.clone())
    }
}

/// Chunked execution and resume settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BatchConfig {
    /// Cross (sources vs candidates) or within (one list against itself)
    pub mode: CompareMode,
    /// Pairs scored per chunk
    #[schemars(range(min = 1))]
    pub chunk_size: usize,
    /// JSON file holding the scan cursor; enables resume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Stop starting new chunks after this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget_secs: Option<u64>,
    /// Stop after this many chunks in one invocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chunks: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: CompareMode::Cross,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state_file: None,
            time_budget_secs: None,
            max_chunks: None,
        }
    }
}

impl BatchConfig {
    #[must_use]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs.map(Duration::from_secs)
    }
}

/// Report output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// Only report the N highest-confidence matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any match is reported
    pub fail_on_match: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

/// Values given on the command line.
///
/// `None` means "not passed"; [`AppConfig::merge`] applies every `Some`,
/// so an explicit flag beats the config file even when it spells out the
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub preset: Option<String>,
    pub threshold: Option<u32>,
    pub exclude_same_id: Option<bool>,
    pub mode: Option<CompareMode>,
    pub chunk_size: Option<usize>,
    pub state_file: Option<PathBuf>,
    pub time_budget_secs: Option<u64>,
    pub max_chunks: Option<usize>,
    pub format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub no_color: Option<bool>,
    pub limit: Option<usize>,
    pub fail_on_match: Option<bool>,
    pub quiet: Option<bool>,
}

impl AppConfig {
    /// Scoring config resolved from the matching section.
    #[must_use]
    pub fn scoring_config(&self) -> ScoringConfig {
        self.matching.to_scoring_config()
    }

    /// Pair selection options for the batch comparator.
    #[must_use]
    pub const fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            mode: self.batch.mode,
            exclude_same_id: self.matching.exclude_same_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_balanced() {
        let config = AppConfig::default();
        assert_eq!(config.scoring_config().threshold, 50);
        assert_eq!(config.batch.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.output.format, ReportFormat::Summary);
    }

    #[test]
    fn test_threshold_overrides_preset() {
        let config = AppConfig::builder().preset("strict").threshold(42).build();
        assert_eq!(config.scoring_config().threshold, 42);

        let config = AppConfig::builder().preset("strict").build();
        assert_eq!(config.scoring_config().threshold, 75);
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        let config = AppConfig::builder().preset("nope").build();
        assert_eq!(config.scoring_config().threshold, 50);
    }

    #[test]
    fn test_batch_options() {
        let config = AppConfig::builder()
            .mode(CompareMode::Within)
            .exclude_same_id(true)
            .build();
        let options = config.batch_options();
        assert_eq!(options.mode, CompareMode::Within);
        assert!(options.exclude_same_id);
    }

    #[test]
    fn test_yaml_sections() {
        let yaml = "matching:\n  preset: permissive\n  points:\n    phone_exact: 5\nbatch:\n  mode: within\n  chunk_size: 10\n";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.batch.mode, CompareMode::Within);
        assert_eq!(config.batch.chunk_size, 10);
        let scoring = config.scoring_config();
        assert_eq!(scoring.threshold, 30);
        assert_eq!(scoring.points.phone_exact, 5);
    }
}
