//! CSV report generator.
//!
//! One row per match, suitable for spreadsheet review queues.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator, ScanSummary};
use crate::matching::PairExplanation;
use crate::model::{MatchCandidate, PersonRecord};
use std::fmt::Write;

const SCAN_HEADER: &str = "confidence,source_id,source_name,source_email,candidate_id,candidate_name,candidate_email,reasons\n";

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate_scan_report(
        &self,
        matches: &[MatchCandidate],
        _summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut content = String::from(SCAN_HEADER);

        for found in config.visible(matches) {
            writeln!(
                content,
                "{},{},{},\"{}\"",
                found.confidence,
                record_columns(&found.source),
                record_columns(&found.candidate),
                escape_csv(&found.reasons.join("; "))
            )?;
        }

        Ok(content)
    }

    fn generate_explain_report(&self, explanation: &PairExplanation) -> Result<String, ReportError> {
        let mut content = String::from("signal,points,reason\n");
        for hit in &explanation.hits {
            writeln!(
                content,
                "{},{},\"{}\"",
                hit.signal.label(),
                hit.points,
                escape_csv(&hit.reason)
            )?;
        }
        writeln!(content, "total,{},\"confidence {}\"", explanation.raw_total, explanation.confidence)?;
        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

fn record_columns(record: &PersonRecord) -> String {
    format!(
        "\"{}\",\"{}\",\"{}\"",
        escape_csv(&record.id.to_string()),
        escape_csv(record.full_name().trim()),
        escape_csv(record.email.trim())
    )
}

fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace(['\n', '\r'], " ")
}
