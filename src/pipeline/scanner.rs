//! Chunked, resumable scan driver.
//!
//! Runs [`PreparedBatch`] chunks until the pair space is exhausted or a
//! limit is hit, persisting [`ScanState`] after every chunk.

use super::state::{scan_fingerprint, ScanState};
use crate::batch::{sort_by_confidence, BatchOptions, PreparedBatch, ScanCursor};
use crate::config::BatchConfig;
use crate::error::{DedupeError, Result, ScanErrorKind};
use crate::matching::ScoringConfig;
use crate::model::{MatchCandidate, PersonRecord};
use crate::reports::ScanSummary;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// When a scan invocation stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Pairs per chunk
    pub chunk_size: usize,
    /// Stop starting new chunks once this much time has passed
    pub time_budget: Option<Duration>,
    /// Stop after this many chunks
    pub max_chunks: Option<usize>,
}

impl ScanLimits {
    /// Run to completion in chunks of `chunk_size`.
    #[must_use]
    pub const fn unbounded(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            time_budget: None,
            max_chunks: None,
        }
    }
}

impl From<&BatchConfig> for ScanLimits {
    fn from(config: &BatchConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            time_budget: config.time_budget(),
            max_chunks: config.max_chunks,
        }
    }
}

/// Why [`Scanner::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every pair has been scored
    Completed,
    /// The time budget ran out
    TimeBudget,
    /// The chunk limit was reached
    ChunkLimit,
}

/// Result of one scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// All matches found so far, highest confidence first
    pub matches: Vec<MatchCandidate>,
    pub summary: ScanSummary,
    pub stop: StopReason,
    /// Matches first found during this invocation
    pub new_matches: usize,
    pub elapsed: Duration,
}

impl ScanOutcome {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::Completed)
    }
}

/// Drives a batch through chunks, optionally backed by a state file.
#[derive(Debug)]
pub struct Scanner {
    batch: PreparedBatch,
    state: ScanState,
    state_path: Option<PathBuf>,
    limits: ScanLimits,
    resumed: bool,
}

impl Scanner {
    /// Prepare a fresh scan.
    pub fn new(
        sources: &[PersonRecord],
        candidates: &[PersonRecord],
        scoring: ScoringConfig,
        options: BatchOptions,
        limits: ScanLimits,
    ) -> Result<Self> {
        if limits.chunk_size == 0 {
            return Err(DedupeError::scan(
                "configuring scan",
                ScanErrorKind::ZeroChunkSize,
            ));
        }

        let fingerprint = scan_fingerprint(
            sources,
            candidates,
            options.mode,
            options.exclude_same_id,
            &scoring,
        )?;
        let threshold = scoring.threshold;
        let batch = PreparedBatch::new(sources, candidates, scoring, options);
        let state = ScanState::new(fingerprint, options.mode, threshold, batch.total_pairs());

        tracing::debug!(
            "Prepared {} scan: {} sources, {} candidates, {} pairs",
            options.mode,
            batch.sources().len(),
            batch.candidates().len(),
            batch.total_pairs()
        );

        Ok(Self {
            batch,
            state,
            state_path: None,
            limits,
            resumed: false,
        })
    }

    /// Persist progress to `path`, resuming from it if it holds a state for
    /// the same inputs.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match ScanState::load(&path)? {
            Some(saved)
                if saved.fingerprint == self.state.fingerprint
                    && saved.total_pairs == self.state.total_pairs =>
            {
                tracing::info!(
                    "Resuming scan from {} at pair {}/{} ({} matches so far)",
                    path.display(),
                    saved.offset,
                    saved.total_pairs,
                    saved.matches.len()
                );
                self.state = saved;
                self.resumed = true;
            }
            Some(_) => {
                tracing::warn!(
                    "State file {} belongs to different inputs or settings; starting over",
                    path.display()
                );
            }
            None => {
                tracing::debug!("No state at {}; starting a new scan", path.display());
            }
        }
        self.state_path = Some(path);
        Ok(self)
    }

    #[must_use]
    pub const fn state(&self) -> &ScanState {
        &self.state
    }

    #[must_use]
    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }

    #[must_use]
    pub const fn batch(&self) -> &PreparedBatch {
        &self.batch
    }

    #[must_use]
    pub const fn resumed(&self) -> bool {
        self.resumed
    }

    /// Score chunks until done or a limit is hit.
    ///
    /// At least one chunk runs whenever pairs remain, so every invocation
    /// makes progress even with a tiny time budget.
    pub fn run(&mut self) -> Result<ScanOutcome> {
        let started = Instant::now();
        self.state.sessions = self.state.sessions.saturating_add(1);

        let mut cursor = ScanCursor {
            offset: self.state.offset,
            total_pairs: self.state.total_pairs,
            matches: Vec::new(),
        };
        let mut chunks_run = 0usize;
        let mut new_matches = 0usize;

        let stop = loop {
            if cursor.is_done() {
                break StopReason::Completed;
            }
            if self.limits.max_chunks.is_some_and(|max| chunks_run >= max) {
                break StopReason::ChunkLimit;
            }
            if chunks_run > 0
                && self
                    .limits
                    .time_budget
                    .is_some_and(|budget| started.elapsed() >= budget)
            {
                break StopReason::TimeBudget;
            }

            let outcome = self.batch.advance(&mut cursor, self.limits.chunk_size);
            chunks_run += 1;
            let added = self.state.merge_matches(cursor.matches.drain(..));
            new_matches += added;
            self.state.offset = cursor.offset;

            tracing::debug!(
                "Chunk {}: pairs {}..{} ({} scored, {} new matches, {:.1}% done)",
                chunks_run,
                outcome.offset,
                outcome.next_offset,
                outcome.scored,
                added,
                cursor.progress() * 100.0
            );

            if let Some(path) = &self.state_path {
                self.state.save(path)?;
            }
        };

        if chunks_run == 0 {
            if let Some(path) = &self.state_path {
                self.state.save(path)?;
            }
        }

        let elapsed = started.elapsed();
        match stop {
            StopReason::Completed => tracing::info!(
                "Scan complete: {} pairs, {} matches ({} new) in {:.2?}",
                self.state.total_pairs,
                self.state.matches.len(),
                new_matches,
                elapsed
            ),
            StopReason::TimeBudget | StopReason::ChunkLimit => tracing::info!(
                "Scan paused at pair {}/{} after {} chunks ({:?}); {} matches so far",
                self.state.offset,
                self.state.total_pairs,
                chunks_run,
                stop,
                self.state.matches.len()
            ),
        }

        Ok(ScanOutcome {
            matches: self.sorted_matches(),
            summary: self.summary(chunks_run),
            stop,
            new_matches,
            elapsed,
        })
    }

    /// Matches found so far, highest confidence first.
    #[must_use]
    pub fn sorted_matches(&self) -> Vec<MatchCandidate> {
        let mut matches: Vec<MatchCandidate> = self.state.matches.values().cloned().collect();
        sort_by_confidence(&mut matches);
        matches
    }

    fn summary(&self, chunks_run: usize) -> ScanSummary {
        ScanSummary {
            sources_path: None,
            candidates_path: None,
            source_count: self.batch.sources().len(),
            candidate_count: self.batch.candidates().len(),
            mode: self.state.mode,
            threshold: self.state.threshold,
            total_pairs: self.state.total_pairs,
            offset: self.state.offset,
            chunks_run,
            resumed: self.resumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::CompareMode;
    use tempfile::tempdir;

    fn roster() -> (Vec<PersonRecord>, Vec<PersonRecord>) {
        let sources = vec![
            PersonRecord::new(1).with_name("Jane", "Doe"),
            PersonRecord::new(2).with_name("Robert", "Smith"),
            PersonRecord::new(3).with_name("Maria", "Garcia"),
        ];
        let candidates = vec![
            PersonRecord::new(10).with_name("Jane", "Doe"),
            PersonRecord::new(11).with_name("Bob", "Smith"),
            PersonRecord::new(12).with_name("Garcia", "Maria"),
            PersonRecord::new(13).with_name("Wei", "Chen"),
        ];
        (sources, candidates)
    }

    fn scanner(limits: ScanLimits) -> Scanner {
        let (sources, candidates) = roster();
        Scanner::new(
            &sources,
            &candidates,
            ScoringConfig::default().with_threshold(15),
            BatchOptions::default(),
            limits,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let (sources, candidates) = roster();
        let err = Scanner::new(
            &sources,
            &candidates,
            ScoringConfig::default(),
            BatchOptions::default(),
            ScanLimits::unbounded(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Scan {
                source: ScanErrorKind::ZeroChunkSize,
                ..
            }
        ));
    }

    #[test]
    fn test_run_to_completion() {
        let mut scanner = scanner(ScanLimits::unbounded(5));
        let outcome = scanner.run().unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.summary.total_pairs, 12);
        assert_eq!(outcome.summary.offset, 12);
        assert_eq!(outcome.summary.chunks_run, 3);
        assert_eq!(outcome.new_matches, outcome.matches.len());
        assert_eq!(outcome.matches[0].confidence, 85);
        assert!(outcome
            .matches
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_chunk_limit_then_resume() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let limits = ScanLimits {
            max_chunks: Some(2),
            ..ScanLimits::unbounded(2)
        };

        let mut first = scanner(limits).with_state_file(&path).unwrap();
        let paused = first.run().unwrap();
        assert_eq!(paused.stop, StopReason::ChunkLimit);
        assert_eq!(paused.summary.offset, 4);
        assert!(!paused.summary.resumed);

        let mut second = scanner(ScanLimits::unbounded(2))
            .with_state_file(&path)
            .unwrap();
        assert!(second.resumed());
        let finished = second.run().unwrap();
        assert!(finished.is_complete());
        assert_eq!(second.state().sessions, 2);

        let mut uninterrupted = scanner(ScanLimits::unbounded(12));
        assert_eq!(finished.matches, uninterrupted.run().unwrap().matches);
    }

    #[test]
    fn test_time_budget_still_makes_progress() {
        let limits = ScanLimits {
            time_budget: Some(Duration::ZERO),
            ..ScanLimits::unbounded(1)
        };
        let outcome = scanner(limits).run().unwrap();
        assert_eq!(outcome.stop, StopReason::TimeBudget);
        assert_eq!(outcome.summary.chunks_run, 1);
        assert_eq!(outcome.summary.offset, 1);
    }

    #[test]
    fn test_stale_state_is_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut stale = ScanState::new("0000000000000000".to_string(), CompareMode::Cross, 15, 12);
        stale.offset = 11;
        stale.save(&path).unwrap();

        let scanner = scanner(ScanLimits::unbounded(4)).with_state_file(&path).unwrap();
        assert!(!scanner.resumed());
        assert_eq!(scanner.state().offset, 0);
    }

    #[test]
    fn test_completed_state_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let first = scanner(ScanLimits::unbounded(100))
            .with_state_file(&path)
            .unwrap()
            .run()
            .unwrap();

        let mut again = scanner(ScanLimits::unbounded(100))
            .with_state_file(&path)
            .unwrap();
        let second = again.run().unwrap();
        assert_eq!(second.summary.chunks_run, 0);
        assert_eq!(second.new_matches, 0);
        assert_eq!(second.matches, first.matches);
    }
}
