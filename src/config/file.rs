//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::{AppConfig, ConfigOverrides};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".person-dedupe.yaml",
    ".person-dedupe.yml",
    "person-dedupe.yaml",
    "person-dedupe.yml",
];

/// Directory under the user config dir.
const CONFIG_DIR_NAME: &str = "person-dedupe";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/person-dedupe/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();
    if let Some(path) = cwd.as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join(CONFIG_DIR_NAME)))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Layer CLI overrides over this config.
    ///
    /// Every value the user passed wins, even when it equals the default;
    /// unset values keep whatever the file said.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        // Matching config
        if let Some(preset) = &overrides.preset {
            self.matching.preset.clone_from(preset);
        }
        if overrides.threshold.is_some() {
            self.matching.threshold = overrides.threshold;
        }
        if let Some(exclude) = overrides.exclude_same_id {
            self.matching.exclude_same_id = exclude;
        }

        // Batch config
        if let Some(mode) = overrides.mode {
            self.batch.mode = mode;
        }
        if let Some(chunk_size) = overrides.chunk_size {
            self.batch.chunk_size = chunk_size;
        }
        if overrides.state_file.is_some() {
            self.batch.state_file.clone_from(&overrides.state_file);
        }
        if overrides.time_budget_secs.is_some() {
            self.batch.time_budget_secs = overrides.time_budget_secs;
        }
        if overrides.max_chunks.is_some() {
            self.batch.max_chunks = overrides.max_chunks;
        }

        // Output config
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.output_file.is_some() {
            self.output.file.clone_from(&overrides.output_file);
        }
        if let Some(no_color) = overrides.no_color {
            self.output.no_color = no_color;
        }
        if overrides.limit.is_some() {
            self.output.limit = overrides.limit;
        }

        // Behavior config
        if let Some(fail) = overrides.fail_on_match {
            self.behavior.fail_on_match = fail;
        }
        if let Some(quiet) = overrides.quiet {
            self.behavior.quiet = quiet;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# person-dedupe configuration
# Place this file at .person-dedupe.yaml in your project root or ~/.config/person-dedupe/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# person-dedupe configuration file
# =================================
#
# Place it at:
#   - .person-dedupe.yaml in your project root
#   - ~/.config/person-dedupe/person-dedupe.yaml for global config
#
# CLI arguments always override file settings.

# Pair scoring
matching:
  # Preset: strict (75), balanced (50), permissive (30)
  preset: balanced
  # Custom threshold 0-100, overrides preset
  # threshold: 60
  # Skip pairs whose records share an id
  exclude_same_id: false
  # Point table; omitted entries keep their defaults
  points:
    full_name_exact: 50
    first_name_high: 15
    first_name_similar: 10
    first_name_phonetic: 8
    last_name_high: 20
    last_name_similar: 12
    last_name_phonetic: 10
    display_name_high: 10
    email_exact: 25
    email_local_similar: 10
    phone_exact: 20
    name_inversion: 15
    nickname: 12
    high_cutoff: 90.0
    similar_cutoff: 75.0
    related_cutoff: 85.0

# Chunked execution
batch:
  # cross: sources vs candidates; within: one list against itself
  mode: cross
  chunk_size: 500
  # Resume interrupted scans from this file
  # state_file: ./scan-state.json
  # Stop starting new chunks after N seconds (exit code 2)
  # time_budget_secs: 30
  # max_chunks: 10

# Output configuration
output:
  # Format: summary, json, csv
  format: summary
  # Output file path (omit for stdout)
  # file: matches.csv
  no_color: false
  # Only report the N highest-confidence matches
  # limit: 100

# Behavior flags
behavior:
  # Exit with code 1 if any match is reported
  fail_on_match: false
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
