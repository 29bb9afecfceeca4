//! Report type definitions.

use crate::batch::CompareMode;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary with a match table
    #[default]
    Summary,
    /// Structured JSON output
    Json,
    /// CSV for spreadsheet import
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Facts about the scan that produced a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub sources_path: Option<String>,
    pub candidates_path: Option<String>,
    pub source_count: usize,
    pub candidate_count: usize,
    pub mode: CompareMode,
    pub threshold: u8,
    /// Size of the flattened pair space
    pub total_pairs: usize,
    /// Pairs visited so far, across resumed sessions
    pub offset: usize,
    /// Chunks run in this invocation
    pub chunks_run: usize,
    /// Whether the scan was resumed from a state file
    pub resumed: bool,
}

impl ScanSummary {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.offset >= self.total_pairs
    }

    /// Percentage of the pair space visited.
    #[must_use]
    pub fn percent_complete(&self) -> f64 {
        if self.total_pairs == 0 {
            return 100.0;
        }
        self.offset.min(self.total_pairs) as f64 * 100.0 / self.total_pairs as f64
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum matches to include (highest confidence first)
    pub limit: Option<usize>,
    /// Title for the report
    pub title: Option<String>,
}

impl ReportConfig {
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// The matches a reporter should render, already sorted by confidence.
    #[must_use]
    pub fn visible<'a, T>(&self, matches: &'a [T]) -> &'a [T] {
        match self.limit {
            Some(limit) => &matches[..limit.min(matches.len())],
            None => matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_complete() {
        let summary = ScanSummary {
            total_pairs: 200,
            offset: 50,
            ..ScanSummary::default()
        };
        assert_eq!(summary.percent_complete(), 25.0);
        assert!(!summary.is_complete());
        assert!(ScanSummary::default().is_complete());
    }

    #[test]
    fn test_visible_respects_limit() {
        let items = [1, 2, 3];
        assert_eq!(ReportConfig::default().visible(&items), &[1, 2, 3]);
        assert_eq!(ReportConfig::default().with_limit(Some(2)).visible(&items), &[1, 2]);
        assert_eq!(ReportConfig::default().with_limit(Some(9)).visible(&items), &[1, 2, 3]);
    }

    #[test]
    fn test_format_serde_lowercase() {
        let json = serde_json::to_string(&ReportFormat::Csv).unwrap();
        assert_eq!(json, "\"csv\"");
    }
}
