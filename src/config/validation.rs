//! Configuration validation.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, BatchConfig, BehaviorConfig, MatchingConfig, OutputConfig};
use crate::matching::{SignalPoints, PRESET_NAMES};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.batch.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let preset = self.preset.to_lowercase();
        if preset != "default" && !PRESET_NAMES.contains(&preset.as_str()) {
            errors.push(ConfigError::new(
                "matching.preset",
                format!(
                    "Invalid preset '{}'. Valid options: {}",
                    self.preset,
                    PRESET_NAMES.join(", ")
                ),
            ));
        }

        if let Some(threshold) = self.threshold {
            if threshold > 100 {
                errors.push(ConfigError::new(
                    "matching.threshold",
                    format!("Threshold must be between 0 and 100, got {threshold}"),
                ));
            }
        }

        errors.extend(self.points.validate());
        errors
    }
}

impl Validatable for SignalPoints {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let cutoffs = [
            ("matching.points.high_cutoff", self.high_cutoff),
            ("matching.points.similar_cutoff", self.similar_cutoff),
            ("matching.points.related_cutoff", self.related_cutoff),
        ];
        for (field, value) in cutoffs {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ConfigError::new(
                    field,
                    format!("Cut-off must be a percentage between 0 and 100, got {value}"),
                ));
            }
        }
        if self.similar_cutoff > self.high_cutoff {
            errors.push(ConfigError::new(
                "matching.points.similar_cutoff",
                format!(
                    "Similar cut-off ({}) must not exceed the high cut-off ({})",
                    self.similar_cutoff, self.high_cutoff
                ),
            ));
        }
        errors
    }
}

impl Validatable for BatchConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.chunk_size == 0 {
            errors.push(ConfigError::new("batch.chunk_size", "Chunk size must be at least 1"));
        }
        if self.time_budget_secs == Some(0) {
            errors.push(ConfigError::new(
                "batch.time_budget_secs",
                "Time budget must be at least 1 second",
            ));
        }
        if self.max_chunks == Some(0) {
            errors.push(ConfigError::new("batch.max_chunks", "Max chunks must be at least 1"));
        }
        if let Some(ref path) = self.state_file {
            if path.is_dir() {
                errors.push(ConfigError::new(
                    "batch.state_file",
                    format!("State file path is a directory: {}", path.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        if self.limit == Some(0) {
            errors.push(ConfigError::new("output.limit", "Limit must be at least 1"));
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}
