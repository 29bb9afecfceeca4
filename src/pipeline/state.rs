//! Persisted scan state.
//!
//! A state file lets a scan that ran out of time pick up where it left off.
//! It carries the resume offset, the matches found so far and a fingerprint
//! of everything that decides which pairs match. A state whose fingerprint
//! differs from the current inputs is stale and must not be resumed.

use crate::batch::CompareMode;
use crate::error::{DedupeError, Result, ScanErrorKind};
use crate::matching::ScoringConfig;
use crate::model::{MatchCandidate, PersonRecord, RecordId};
use crate::utils::Fingerprinter;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current on-disk layout version.
pub const STATE_VERSION: u32 = 1;

/// Matches keyed by `(source id, candidate id)`, in discovery order.
pub type MatchMap = IndexMap<(RecordId, RecordId), MatchCandidate>;

/// Everything needed to resume a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanState {
    pub version: u32,
    /// Hash of the inputs and scoring settings
    pub fingerprint: String,
    pub mode: CompareMode,
    pub threshold: u8,
    /// Next flattened pair index to score
    pub offset: usize,
    pub total_pairs: usize,
    #[serde(with = "match_list")]
    pub matches: MatchMap,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Invocations that have contributed to this state
    pub sessions: u32,
}

impl ScanState {
    /// Fresh state at offset zero.
    #[must_use]
    pub fn new(fingerprint: String, mode: CompareMode, threshold: u8, total_pairs: usize) -> Self {
        let now = Utc::now();
        Self {
            version: STATE_VERSION,
            fingerprint,
            mode,
            threshold,
            offset: 0,
            total_pairs,
            matches: IndexMap::new(),
            started_at: now,
            updated_at: now,
            sessions: 0,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.offset >= self.total_pairs
    }

    /// Add matches, keeping the first occurrence of each pair.
    ///
    /// Returns how many were new.
    pub fn merge_matches(&mut self, matches: impl IntoIterator<Item = MatchCandidate>) -> usize {
        let before = self.matches.len();
        for found in matches {
            self.matches.entry(found.pair_key()).or_insert(found);
        }
        self.matches.len() - before
    }

    /// Read a state file. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DedupeError::io(path, e)),
        };
        let state: Self = serde_json::from_str(&content).map_err(|e| {
            DedupeError::scan(
                format!("reading {}", path.display()),
                ScanErrorKind::CorruptState(e.to_string()),
            )
        })?;
        if state.version != STATE_VERSION {
            return Err(DedupeError::scan(
                format!("reading {}", path.display()),
                ScanErrorKind::CorruptState(format!(
                    "unsupported state version {} (expected {STATE_VERSION})",
                    state.version
                )),
            ));
        }
        Ok(Some(state))
    }

    /// Write the state, replacing any previous file.
    ///
    /// Writes to a sibling temporary file first and renames it over the
    /// target, so an interrupted save leaves the old state intact.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.updated_at = Utc::now();
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            DedupeError::scan(
                format!("serializing state for {}", path.display()),
                ScanErrorKind::CorruptState(e.to_string()),
            )
        })?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);
        std::fs::write(&tmp, json).map_err(|e| DedupeError::io(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| DedupeError::io(path, e))?;
        tracing::debug!(
            "Saved scan state to {} (offset {}/{})",
            path.display(),
            self.offset,
            self.total_pairs
        );
        Ok(())
    }
}

/// Fingerprint of everything that determines a scan's matches.
///
/// Covers both record lists, the compare mode, same-id exclusion and the
/// full scoring configuration.
pub fn scan_fingerprint(
    sources: &[PersonRecord],
    candidates: &[PersonRecord],
    mode: CompareMode,
    exclude_same_id: bool,
    scoring: &ScoringConfig,
) -> Result<String> {
    let mut fingerprinter = Fingerprinter::new();
    fingerprinter
        .part(&serde_json::to_vec(sources)?)
        .part(mode.to_string().as_bytes())
        .part(&[u8::from(exclude_same_id), scoring.threshold])
        .part(&serde_json::to_vec(&scoring.points)?);
    if mode == CompareMode::Cross {
        fingerprinter.part(&serde_json::to_vec(candidates)?);
    }
    Ok(fingerprinter.finish_hex())
}

/// Stores [`MatchMap`] as a plain list; keys are rebuilt from each match.
mod match_list {
    use super::MatchMap;
    use crate::model::MatchCandidate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(map: &MatchMap, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MatchMap, D::Error> {
        let list = Vec::<MatchCandidate>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|m| (m.pair_key(), m)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn found(source: i64, candidate: i64, confidence: u8) -> MatchCandidate {
        MatchCandidate {
            confidence,
            reasons: vec!["EXACT phone match: 555 vs 555".to_string()],
            source: PersonRecord::new(source),
            candidate: PersonRecord::new(candidate),
        }
    }

    #[test]
    fn test_merge_keeps_first_occurrence() {
        let mut state = ScanState::new("abc".to_string(), CompareMode::Cross, 50, 4);
        assert_eq!(state.merge_matches([found(1, 2, 60), found(1, 3, 70)]), 2);
        assert_eq!(state.merge_matches([found(1, 2, 99)]), 0);
        assert_eq!(state.matches.len(), 2);
        assert_eq!(
            state.matches[&(RecordId::Int(1), RecordId::Int(2))].confidence,
            60
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.json");

        assert!(ScanState::load(&path).unwrap().is_none());

        let mut state = ScanState::new("abc".to_string(), CompareMode::Within, 40, 10);
        state.offset = 6;
        state.merge_matches([found(1, 2, 60)]);
        state.save(&path).unwrap();

        let loaded = ScanState::load(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
        assert!(!dir.path().join("scan.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, "{\"offset\": ").unwrap();

        let err = ScanState::load(&path).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Scan {
                source: ScanErrorKind::CorruptState(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.json");
        let mut state = ScanState::new("abc".to_string(), CompareMode::Cross, 50, 1);
        state.version = 99;
        std::fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        assert!(ScanState::load(&path).is_err());
    }

    #[test]
    fn test_fingerprint_tracks_inputs() {
        let sources = vec![PersonRecord::new(1).with_name("Ann", "Lee")];
        let candidates = vec![PersonRecord::new(2).with_name("Anne", "Lee")];
        let scoring = ScoringConfig::default();

        let base = scan_fingerprint(&sources, &candidates, CompareMode::Cross, false, &scoring)
            .unwrap();
        assert_eq!(
            base,
            scan_fingerprint(&sources, &candidates, CompareMode::Cross, false, &scoring).unwrap()
        );

        let edited = vec![PersonRecord::new(2).with_name("Anna", "Lee")];
        assert_ne!(
            base,
            scan_fingerprint(&sources, &edited, CompareMode::Cross, false, &scoring).unwrap()
        );
        assert_ne!(
            base,
            scan_fingerprint(&sources, &candidates, CompareMode::Cross, true, &scoring).unwrap()
        );
        assert_ne!(
            base,
            scan_fingerprint(
                &sources,
                &candidates,
                CompareMode::Cross,
                false,
                &scoring.clone().with_threshold(60)
            )
            .unwrap()
        );
    }

    #[test]
    fn test_within_fingerprint_ignores_candidates() {
        let sources = vec![PersonRecord::new(1)];
        let scoring = ScoringConfig::default();
        let a = scan_fingerprint(&sources, &[], CompareMode::Within, false, &scoring).unwrap();
        let b = scan_fingerprint(
            &sources,
            &[PersonRecord::new(9)],
            CompareMode::Within,
            false,
            &scoring,
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
