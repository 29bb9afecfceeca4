//! Configuration module for person-dedupe.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading, discovery and CLI merging
//!
//! # Quick Start
//!
//! ```rust
//! use person_dedupe::config::{AppConfig, ConfigPreset, Validatable};
//!
//! let config = AppConfig::builder()
//!     .preset("strict")
//!     .threshold(60)
//!     .chunk_size(1000)
//!     .build();
//! assert!(config.is_valid());
//! assert_eq!(config.scoring_config().threshold, 60);
//!
//! let ci = AppConfig::from_preset(ConfigPreset::CiCd);
//! assert!(ci.behavior.fail_on_match);
//! ```
//!
//! # Configuration File
//!
//! Place a `.person-dedupe.yaml` file in your project root or `~/.config/person-dedupe/`:
//!
//! ```yaml
//! matching:
//!   preset: strict
//!   threshold: 70
//! batch:
//!   chunk_size: 1000
//!   state_file: scan-state.json
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, DEFAULT_CHUNK_SIZE, DEFAULT_PRESET};
pub use types::{
    AppConfig, AppConfigBuilder, BatchConfig, BehaviorConfig, ConfigOverrides, MatchingConfig,
    OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// The schema documents every option that can be set in
/// `.person-dedupe.yaml`; editors can use it for completion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::DedupeError::config(format!("schema serialization: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema().expect("schema serializes");
        for section in ["matching", "batch", "output", "behavior", "chunk_size"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
