//! Report output stage.

use super::{should_use_color, write_output, OutputTarget, ScanOutcome};
use crate::config::AppConfig;
use crate::matching::PairExplanation;
use crate::reports::{create_reporter_with_options, ReportConfig};
use anyhow::Result;

/// Render a scan outcome in the configured format and write it out.
pub fn output_scan_report(config: &AppConfig, outcome: &ScanOutcome) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let use_color = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter_with_options(config.output.format, use_color);
    let report_config = ReportConfig::default().with_limit(config.output.limit);

    let report = reporter.generate_scan_report(&outcome.matches, &outcome.summary, &report_config)?;
    write_output(&report, &target, config.behavior.quiet)
}

/// Render a single pair breakdown and write it out.
pub fn output_explain_report(config: &AppConfig, explanation: &PairExplanation) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let use_color = should_use_color(config.output.no_color, &target);
    let reporter = create_reporter_with_options(config.output.format, use_color);

    let report = reporter.generate_explain_report(explanation)?;
    write_output(&report, &target, config.behavior.quiet)
}
