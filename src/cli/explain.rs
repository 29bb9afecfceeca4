//! Explain command handler.
//!
//! Scores one pair and prints every signal that fired, whether or not the
//! pair clears the threshold.

use crate::config::AppConfig;
use crate::error::{DedupeError, ScanErrorKind};
use crate::matching::PairScorer;
use crate::model::{PersonRecord, RecordId};
use crate::pipeline::{exit_codes, load_records, output_explain_report};
use anyhow::Result;
use std::path::PathBuf;

/// The pair to explain.
#[derive(Debug, Clone)]
pub struct ExplainTarget {
    pub sources: PathBuf,
    /// Where to find the candidate; defaults to the sources file
    pub candidates: Option<PathBuf>,
    pub source_id: RecordId,
    pub candidate_id: RecordId,
}

/// Run the explain command, returning the desired exit code.
pub fn run_explain(config: &AppConfig, target: &ExplainTarget) -> Result<i32> {
    let sources = load_records(&target.sources)?;
    let source = find_record(&sources.records, &target.source_id, &sources.path)?;

    let candidate = match &target.candidates {
        Some(path) => {
            let candidates = load_records(path)?;
            find_record(&candidates.records, &target.candidate_id, &candidates.path)?
        }
        None => find_record(&sources.records, &target.candidate_id, &sources.path)?,
    };

    let explanation = PairScorer::new(config.scoring_config()).explain(&source, &candidate);
    tracing::debug!("{}", explanation.summary());

    output_explain_report(config, &explanation)?;

    if config.behavior.fail_on_match && explanation.is_match() {
        return Ok(exit_codes::MATCHES_FOUND);
    }
    Ok(exit_codes::SUCCESS)
}

fn find_record(records: &[PersonRecord], id: &RecordId, path: &str) -> crate::error::Result<PersonRecord> {
    // Ids typed on the command line parse as integers when they can, but a
    // dump may store the same id as a string.
    let text = id.to_string();
    records
        .iter()
        .find(|r| &r.id == id)
        .or_else(|| records.iter().find(|r| r.id.to_string() == text))
        .cloned()
        .ok_or_else(|| {
            DedupeError::scan(
                format!("looking up id in {path}"),
                ScanErrorKind::RecordNotFound(text),
            )
        })
}
