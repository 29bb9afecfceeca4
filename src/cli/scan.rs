//! Scan command handler.
//!
//! Implements the `scan` subcommand: compare two record dumps (or one dump
//! against itself) and report likely duplicates.

use crate::batch::CompareMode;
use crate::config::{AppConfig, Validatable};
use crate::error::DedupeError;
use crate::pipeline::{exit_codes, load_records, output_scan_report, ScanLimits, ScanOutcome, Scanner};
use anyhow::Result;
use std::path::PathBuf;

/// Input files for a scan.
#[derive(Debug, Clone)]
pub struct ScanPaths {
    pub sources: PathBuf,
    /// Without candidates the sources are compared against themselves
    pub candidates: Option<PathBuf>,
}

/// Run the scan command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_scan(mut config: AppConfig, paths: &ScanPaths) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(DedupeError::validation(format!(
            "invalid configuration:\n  {}",
            joined.join("\n  ")
        ))
        .into());
    }

    let sources = load_records(&paths.sources)?;
    let candidates = match &paths.candidates {
        Some(path) => {
            if config.batch.mode == CompareMode::Within {
                tracing::warn!(
                    "Within mode compares {} against itself; ignoring {}",
                    paths.sources.display(),
                    path.display()
                );
                None
            } else {
                Some(load_records(path)?)
            }
        }
        None => {
            config.batch.mode = CompareMode::Within;
            None
        }
    };
    let candidate_records = candidates.as_ref().map_or(&[][..], |c| c.records.as_slice());

    let scoring = config.scoring_config();
    if !config.behavior.quiet {
        tracing::info!(
            "Scanning in {} mode with threshold {}",
            config.batch.mode,
            scoring.threshold
        );
    }

    let mut scanner = Scanner::new(
        &sources.records,
        candidate_records,
        scoring,
        config.batch_options(),
        ScanLimits::from(&config.batch),
    )?;
    if let Some(state_file) = &config.batch.state_file {
        scanner = scanner.with_state_file(state_file)?;
    }

    let mut outcome = scanner.run()?;
    outcome.summary.sources_path = Some(sources.path.clone());
    outcome.summary.candidates_path = candidates.map(|c| c.path);

    output_scan_report(&config, &outcome)?;
    Ok(determine_exit_code(&config, &outcome))
}

/// An unfinished scan outranks `--fail-on-match`: callers must rerun first.
fn determine_exit_code(config: &AppConfig, outcome: &ScanOutcome) -> i32 {
    if !outcome.is_complete() {
        return exit_codes::SCAN_INCOMPLETE;
    }
    if config.behavior.fail_on_match && !outcome.matches.is_empty() {
        return exit_codes::MATCHES_FOUND;
    }
    exit_codes::SUCCESS
}
