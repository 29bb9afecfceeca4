//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator, ScanSummary};
use crate::matching::PairExplanation;
use crate::model::MatchCandidate;
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_scan_report(
        &self,
        matches: &[MatchCandidate],
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let visible = config.visible(matches);
        let report = JsonScanReport {
            metadata: metadata(config.title.clone()),
            scan: JsonScanInfo {
                summary,
                complete: summary.is_complete(),
                percent_complete: summary.percent_complete(),
                match_count: matches.len(),
                reported: visible.len(),
            },
            matches: visible,
        };
        self.render(&report)
    }

    fn generate_explain_report(&self, explanation: &PairExplanation) -> Result<String, ReportError> {
        let report = JsonExplainReport {
            metadata: metadata(None),
            is_match: explanation.is_match(),
            explanation,
        };
        self.render(&report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

fn metadata(title: Option<String>) -> JsonReportMetadata {
    JsonReportMetadata {
        tool: ToolInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: Utc::now().to_rfc3339(),
        title,
    }
}

#[derive(Serialize)]
struct JsonScanReport<'a> {
    metadata: JsonReportMetadata,
    scan: JsonScanInfo<'a>,
    matches: &'a [MatchCandidate],
}

#[derive(Serialize)]
struct JsonScanInfo<'a> {
    #[serde(flatten)]
    summary: &'a ScanSummary,
    complete: bool,
    percent_complete: f64,
    /// Matches found so far
    match_count: usize,
    /// Matches included below, after the limit
    reported: usize,
}

#[derive(Serialize)]
struct JsonExplainReport<'a> {
    metadata: JsonReportMetadata,
    is_match: bool,
    explanation: &'a PairExplanation,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}
