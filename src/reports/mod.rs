//! Report generation for scan results.
//!
//! This module provides three output formats:
//! - Summary: human-readable terminal output with a match table
//! - JSON: structured data for programmatic integration
//! - CSV: one row per match for spreadsheet review
//!
//! Reporters receive matches already sorted by confidence.

mod csv;
mod json;
mod summary;
mod types;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ReportConfig, ReportFormat, ScanSummary};

use crate::matching::PairExplanation;
use crate::model::MatchCandidate;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for a (possibly partial) scan
    fn generate_scan_report(
        &self,
        matches: &[MatchCandidate],
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report breaking one pair down signal by signal
    fn generate_explain_report(&self, explanation: &PairExplanation) -> Result<String, ReportError>;

    /// Write a scan report to a writer
    fn write_scan_report(
        &self,
        matches: &[MatchCandidate],
        summary: &ScanSummary,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_scan_report(matches, summary, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}
