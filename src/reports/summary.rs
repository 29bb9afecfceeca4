//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator, ScanSummary};
use crate::matching::{PairExplanation, SimilarityResult};
use crate::model::MatchCandidate;
use unicode_width::UnicodeWidthStr;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Pad to a display width, counting wide characters as two columns.
fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - used))
}

/// Widest label allowed before the column stops growing.
const MAX_LABEL_WIDTH: usize = 40;

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn confidence_color(confidence: u8) -> &'static str {
        match confidence {
            75..=u8::MAX => "red",
            50..=74 => "yellow",
            _ => "dim",
        }
    }

    fn similarity_line(&self, field: &str, sim: &SimilarityResult) -> String {
        format!(
            "  {}  edit {:>6.2}%  overlap {:>6.2}%  soundex {}  metaphone {}",
            pad(field, 8),
            sim.edit_distance_pct,
            sim.overlap_pct,
            yes_no(sim.soundex_equal),
            yes_no(sim.metaphone_equal)
        )
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no "
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_scan_report(
        &self,
        matches: &[MatchCandidate],
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        // Header
        let title = config.title.as_deref().unwrap_or("Duplicate Identity Scan");
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        let sources = summary.sources_path.as_deref().unwrap_or("sources");
        let inputs = match (&summary.candidates_path, summary.mode) {
            (Some(candidates), crate::batch::CompareMode::Cross) => format!(
                "{sources} ({}) vs {candidates} ({})",
                summary.source_count, summary.candidate_count
            ),
            _ => format!("{sources} ({}) against itself", summary.source_count),
        };
        lines.push(format!("{}  {inputs}", self.color("Inputs:  ", "cyan")));
        lines.push(format!(
            "{}  {}, threshold {}",
            self.color("Mode:    ", "cyan"),
            summary.mode,
            summary.threshold
        ));
        lines.push(format!(
            "{}  {} / {} pairs ({:.1}%){}",
            self.color("Progress:", "cyan"),
            summary.offset.min(summary.total_pairs),
            summary.total_pairs,
            summary.percent_complete(),
            if summary.resumed { ", resumed" } else { "" }
        ));
        lines.push(format!("{}  {}", self.color("Matches: ", "cyan"), matches.len()));
        lines.push(String::new());

        let visible = config.visible(matches);
        if visible.is_empty() {
            lines.push(self.color("No likely duplicates found.", "green"));
        } else {
            let width = visible
                .iter()
                .map(|m| m.source.label().width())
                .max()
                .unwrap_or(0)
                .min(MAX_LABEL_WIDTH);

            lines.push(self.color(
                &format!("{:>4}  {}  {}", "Conf", pad("Source", width), "Candidate"),
                "bold",
            ));
            for found in visible {
                lines.push(format!(
                    "{}  {}  {}",
                    self.color(
                        &format!("{:>4}", found.confidence),
                        Self::confidence_color(found.confidence)
                    ),
                    pad(&found.source.label(), width),
                    found.candidate.label()
                ));
                for reason in &found.reasons {
                    lines.push(self.color(&format!("        - {reason}"), "dim"));
                }
            }
            if visible.len() < matches.len() {
                lines.push(self.color(
                    &format!("... {} more not shown", matches.len() - visible.len()),
                    "dim",
                ));
            }
        }

        if !summary.is_complete() {
            lines.push(String::new());
            lines.push(self.color(
                "Scan incomplete: run again with the same state file to continue.",
                "yellow",
            ));
        }

        lines.push(String::new());
        Ok(lines.join("\n"))
    }

    fn generate_explain_report(&self, explanation: &PairExplanation) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        lines.push(self.color("Pair Explanation", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {}",
            self.color("Source:   ", "cyan"),
            explanation.source.label()
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Candidate:", "cyan"),
            explanation.candidate.label()
        ));
        lines.push(String::new());

        lines.push(self.color("Similarity:", "bold"));
        lines.push(self.similarity_line("first", &explanation.first_name));
        lines.push(self.similarity_line("last", &explanation.last_name));
        lines.push(self.similarity_line("display", &explanation.display_name));
        lines.push(String::new());

        lines.push(self.color("Signals:", "bold"));
        if explanation.hits.is_empty() {
            lines.push("  (none)".to_string());
        }
        for hit in &explanation.hits {
            lines.push(format!(
                "  {}  {}",
                self.color(&format!("{:>+4}", hit.points), "green"),
                hit.reason
            ));
        }
        lines.push(String::new());

        let verdict = if explanation.is_match() {
            self.color("MATCH", "red")
        } else {
            self.color("no match", "dim")
        };
        lines.push(format!(
            "Confidence {} (raw {}) vs threshold {}: {verdict}",
            explanation.confidence, explanation.raw_total, explanation.threshold
        ));
        lines.push(String::new());

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
