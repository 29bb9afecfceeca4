//! Resumable batch comparison over the cross product of two record lists.
//!
//! The pair space is flattened to one dimension with
//! `index = source_index * candidates.len() + candidate_index`, so a scan
//! can stop after any pair and resume from a plain integer offset. Chunks
//! are independent; the only state carried between them is the offset and
//! the matches found so far (see [`ScanCursor`]).

mod cursor;

pub use cursor::ScanCursor;

use crate::matching::{PairScorer, PreparedRecord, ScoringConfig};
use crate::model::{MatchCandidate, PersonRecord};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which pairs a batch covers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Every source against every candidate
    #[default]
    Cross,
    /// One list against itself, each unordered pair once
    Within,
}

impl std::fmt::Display for CompareMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cross => write!(f, "cross"),
            Self::Within => write!(f, "within"),
        }
    }
}

/// Options that select pairs without affecting their scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub mode: CompareMode,
    /// Skip pairs whose records carry the same id
    pub exclude_same_id: bool,
}

/// Result of one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkOutcome {
    /// Matches in ascending flattened-index order
    pub matches: Vec<MatchCandidate>,
    /// Offset the chunk started at
    pub offset: usize,
    /// Offset to resume from
    pub next_offset: usize,
    /// Pairs actually scored (skipped pairs excluded)
    pub scored: usize,
    /// No pairs remain after this chunk
    pub done: bool,
}

/// Both record lists, prepared once, plus the scorer.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    sources: Vec<PreparedRecord>,
    /// `None` in within mode; candidates are the sources
    candidates: Option<Vec<PreparedRecord>>,
    scorer: PairScorer,
    exclude_same_id: bool,
}

impl PreparedBatch {
    /// Prepare a batch. In [`CompareMode::Within`] the candidate list is
    /// ignored and the sources are compared against themselves.
    pub fn new(
        sources: &[PersonRecord],
        candidates: &[PersonRecord],
        config: ScoringConfig,
        options: BatchOptions,
    ) -> Self {
        let sources: Vec<PreparedRecord> = sources.iter().map(PreparedRecord::from).collect();
        let candidates = match options.mode {
            CompareMode::Cross => Some(candidates.iter().map(PreparedRecord::from).collect()),
            CompareMode::Within => None,
        };
        Self {
            sources,
            candidates,
            scorer: PairScorer::new(config),
            exclude_same_id: options.exclude_same_id,
        }
    }

    #[must_use]
    pub fn sources(&self) -> &[PreparedRecord] {
        &self.sources
    }

    #[must_use]
    pub fn candidates(&self) -> &[PreparedRecord] {
        self.candidates.as_deref().unwrap_or(&self.sources)
    }

    #[must_use]
    pub const fn mode(&self) -> CompareMode {
        if self.candidates.is_some() {
            CompareMode::Cross
        } else {
            CompareMode::Within
        }
    }

    #[must_use]
    pub const fn scorer(&self) -> &PairScorer {
        &self.scorer
    }

    /// Size of the flattened index space.
    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.sources.len().saturating_mul(self.candidates().len())
    }

    /// Decode a flattened index into `(source_index, candidate_index)`.
    #[must_use]
    pub fn pair_at(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.total_pairs() {
            return None;
        }
        let width = self.candidates().len();
        Some((index / width, index % width))
    }

    fn skips(&self, source_idx: usize, candidate_idx: usize) -> bool {
        if self.candidates.is_none() && candidate_idx <= source_idx {
            return true;
        }
        self.exclude_same_id
            && self.sources[source_idx].record().id == self.candidates()[candidate_idx].record().id
    }

    /// Score pairs `[offset, min(offset + limit, total_pairs))`.
    ///
    /// An offset at or past the end returns an empty, finished outcome.
    #[must_use]
    pub fn compare_range(&self, offset: usize, limit: usize) -> ChunkOutcome {
        let total = self.total_pairs();
        let end = offset.saturating_add(limit).min(total);
        let mut outcome = ChunkOutcome {
            offset,
            next_offset: end.max(offset),
            done: end >= total,
            ..ChunkOutcome::default()
        };

        let candidates = self.candidates();
        for index in offset..end {
            let Some((s, c)) = self.pair_at(index) else {
                break;
            };
            if self.skips(s, c) {
                continue;
            }
            outcome.scored += 1;
            if let Some(found) = self.scorer.score_prepared(&self.sources[s], &candidates[c]) {
                outcome.matches.push(found);
            }
        }
        outcome
    }

    /// Run one chunk from the cursor's offset and fold the result into it.
    pub fn advance(&self, cursor: &mut ScanCursor, limit: usize) -> ChunkOutcome {
        let outcome = self.compare_range(cursor.offset, limit);
        cursor.absorb(&outcome);
        outcome
    }

    /// Score the entire pair space in one pass.
    #[must_use]
    pub fn compare_all(&self) -> Vec<MatchCandidate> {
        self.compare_range(0, self.total_pairs()).matches
    }
}

/// Compare every source against every candidate with the default point table.
///
/// Output is in ascending flattened-index order, not sorted by confidence.
///
/// ```
/// use person_dedupe::batch::compare_all;
/// use person_dedupe::model::{PersonRecord, RecordId};
///
/// let sources = vec![PersonRecord::new(1).with_name("Jane", "Doe")];
/// let candidates = vec![
///     PersonRecord::new(10).with_name("John", "Smith"),
///     PersonRecord::new(11).with_name("Jane", "Doe"),
/// ];
/// let matches = compare_all(&sources, &candidates, 40);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].candidate.id, RecordId::Int(11));
/// ```
#[must_use]
pub fn compare_all(
    sources: &[PersonRecord],
    candidates: &[PersonRecord],
    threshold: u8,
) -> Vec<MatchCandidate> {
    PreparedBatch::new(
        sources,
        candidates,
        ScoringConfig::default().with_threshold(threshold),
        BatchOptions::default(),
    )
    .compare_all()
}

/// Stable sort by confidence, highest first; ties keep their order.
pub fn sort_by_confidence(matches: &mut [MatchCandidate]) {
    matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    fn people(names: &[(&str, &str)], first_id: i64) -> Vec<PersonRecord> {
        names
            .iter()
            .zip(first_id..)
            .map(|(&(first, last), id)| PersonRecord::new(id).with_name(first, last))
            .collect()
    }

    fn batch(sources: &[PersonRecord], candidates: &[PersonRecord], options: BatchOptions) -> PreparedBatch {
        PreparedBatch::new(
            sources,
            candidates,
            ScoringConfig::default().with_threshold(10),
            options,
        )
    }

    #[test]
    fn test_pair_at_decodes_row_major() {
        let s = people(&[("A", "A"), ("B", "B")], 1);
        let c = people(&[("X", "X"), ("Y", "Y"), ("Z", "Z")], 10);
        let b = batch(&s, &c, BatchOptions::default());
        assert_eq!(b.total_pairs(), 6);
        assert_eq!(b.pair_at(0), Some((0, 0)));
        assert_eq!(b.pair_at(4), Some((1, 1)));
        assert_eq!(b.pair_at(5), Some((1, 2)));
        assert_eq!(b.pair_at(6), None);
    }

    #[test]
    fn test_empty_inputs() {
        let s = people(&[("Jane", "Doe")], 1);
        let b = batch(&s, &[], BatchOptions::default());
        assert_eq!(b.total_pairs(), 0);
        assert_eq!(b.pair_at(0), None);
        let outcome = b.compare_range(0, 100);
        assert!(outcome.done);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn test_compare_range_bounds() {
        let s = people(&[("Jane", "Doe"), ("John", "Smith")], 1);
        let c = people(&[("John", "Smith"), ("Jane", "Doe")], 10);
        let b = batch(&s, &c, BatchOptions::default());

        let first = b.compare_range(0, 3);
        assert_eq!(first.next_offset, 3);
        assert_eq!(first.scored, 3);
        assert!(!first.done);

        let second = b.compare_range(first.next_offset, 3);
        assert_eq!(second.next_offset, 4);
        assert!(second.done);

        let past_end = b.compare_range(10, 3);
        assert!(past_end.done);
        assert_eq!(past_end.next_offset, 10);
        assert_eq!(past_end.scored, 0);
    }

    #[test]
    fn test_matches_in_flattened_order() {
        let s = people(&[("Jane", "Doe"), ("John", "Smith")], 1);
        let c = people(&[("John", "Smith"), ("Jane", "Doe")], 10);
        let matches = batch(&s, &c, BatchOptions::default()).compare_all();
        let pairs: Vec<_> = matches.iter().map(MatchCandidate::pair_key).collect();
        assert_eq!(
            pairs,
            vec![
                (RecordId::Int(1), RecordId::Int(11)),
                (RecordId::Int(2), RecordId::Int(10)),
            ]
        );
    }

    #[test]
    fn test_chunked_equals_unchunked() {
        let s = people(&[("Jane", "Doe"), ("John", "Smith"), ("Bob", "Smith")], 1);
        let c = people(&[("Robert", "Smith"), ("Jane", "Doe"), ("Jon", "Smith")], 10);
        let b = batch(&s, &c, BatchOptions::default());
        let all = b.compare_all();

        let mut cursor = ScanCursor::new(b.total_pairs());
        while !cursor.is_done() {
            b.advance(&mut cursor, 2);
        }
        assert_eq!(cursor.matches, all);
    }

    #[test]
    fn test_within_mode_skips_self_and_mirrored_pairs() {
        let s = people(&[("Jane", "Doe"), ("Jane", "Doe"), ("Jane", "Doe")], 1);
        let b = batch(&s, &[], BatchOptions {
            mode: CompareMode::Within,
            exclude_same_id: false,
        });
        assert_eq!(b.mode(), CompareMode::Within);
        assert_eq!(b.total_pairs(), 9);

        let outcome = b.compare_range(0, 9);
        assert_eq!(outcome.scored, 3);
        let pairs: Vec<_> = outcome.matches.iter().map(MatchCandidate::pair_key).collect();
        assert_eq!(
            pairs,
            vec![
                (RecordId::Int(1), RecordId::Int(2)),
                (RecordId::Int(1), RecordId::Int(3)),
                (RecordId::Int(2), RecordId::Int(3)),
            ]
        );
    }

    #[test]
    fn test_exclude_same_id() {
        let s = people(&[("Jane", "Doe")], 1);
        let c = vec![
            PersonRecord::new(1).with_name("Jane", "Doe"),
            PersonRecord::new(2).with_name("Jane", "Doe"),
        ];
        let options = BatchOptions {
            mode: CompareMode::Cross,
            exclude_same_id: true,
        };
        let outcome = batch(&s, &c, options).compare_range(0, 10);
        assert_eq!(outcome.scored, 1);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].candidate.id, RecordId::Int(2));
    }

    #[test]
    fn test_sort_by_confidence_is_stable() {
        let make = |id: i64, confidence: u8| MatchCandidate {
            confidence,
            reasons: Vec::new(),
            source: PersonRecord::new(id),
            candidate: PersonRecord::new(id + 100),
        };
        let mut matches = vec![make(1, 50), make(2, 90), make(3, 50), make(4, 90)];
        sort_by_confidence(&mut matches);
        let ids: Vec<_> = matches.iter().map(|m| m.source.id.clone()).collect();
        let expected: Vec<RecordId> = [2, 4, 1, 3].into_iter().map(RecordId::Int).collect();
        assert_eq!(ids, expected);
    }
}
