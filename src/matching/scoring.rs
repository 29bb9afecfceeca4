//! Additive point-based pair scoring.
//!
//! Each signal that fires adds a fixed number of points (see
//! [`SignalPoints`]); the sum is clamped to 100 and compared against the
//! threshold. Every fired signal also leaves a human-readable reason that
//! quotes the raw field values, so a reviewer can audit a score without
//! re-running it.

use super::config::{ScoringConfig, SignalPoints};
use super::nicknames::are_nickname_variants;
use super::normalize::normalize_name;
use super::string_similarity::{NameKey, SimilarityResult};
use crate::model::{email_local_part, phone_digits, MatchCandidate, PersonRecord};
use serde::Serialize;
use std::fmt;

/// A scoring signal, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    FullNameExact,
    FirstNameHigh,
    FirstNameSimilar,
    FirstNamePhonetic,
    LastNameHigh,
    LastNameSimilar,
    LastNamePhonetic,
    DisplayNameHigh,
    EmailExact,
    EmailLocalSimilar,
    PhoneExact,
    NameInversion,
    Nickname,
}

impl Signal {
    /// Fixed lead text of the reason string.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullNameExact => "EXACT full name match",
            Self::FirstNameHigh => "First name high match",
            Self::FirstNameSimilar => "First name similar",
            Self::FirstNamePhonetic => "First name sounds similar",
            Self::LastNameHigh => "Last name high match",
            Self::LastNameSimilar => "Last name similar",
            Self::LastNamePhonetic => "Last name sounds similar",
            Self::DisplayNameHigh => "Display name high match",
            Self::EmailExact => "EXACT email match",
            Self::EmailLocalSimilar => "Email local part similar",
            Self::PhoneExact => "EXACT phone match",
            Self::NameInversion => "Possible name inversion",
            Self::Nickname => "Possible nickname match",
        }
    }

    /// Points for this signal in a point table.
    #[must_use]
    pub const fn points(self, table: &SignalPoints) -> u32 {
        match self {
            Self::FullNameExact => table.full_name_exact,
            Self::FirstNameHigh => table.first_name_high,
            Self::FirstNameSimilar => table.first_name_similar,
            Self::FirstNamePhonetic => table.first_name_phonetic,
            Self::LastNameHigh => table.last_name_high,
            Self::LastNameSimilar => table.last_name_similar,
            Self::LastNamePhonetic => table.last_name_phonetic,
            Self::DisplayNameHigh => table.display_name_high,
            Self::EmailExact => table.email_exact,
            Self::EmailLocalSimilar => table.email_local_similar,
            Self::PhoneExact => table.phone_exact,
            Self::NameInversion => table.name_inversion,
            Self::Nickname => table.nickname,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One fired signal with its points and reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalHit {
    pub signal: Signal,
    pub points: u32,
    pub reason: String,
}

/// A record with every comparison key computed once.
///
/// Building one normalizes and phonetically encodes each name field; the
/// batch comparator builds one per input record and reuses it for every
/// pair the record takes part in.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    record: PersonRecord,
    full_name: String,
    first: NameKey,
    last: NameKey,
    display: NameKey,
    /// Lowercased authoritative email
    email: Option<String>,
    email_local: NameKey,
    phone: String,
}

impl PreparedRecord {
    pub fn new(record: PersonRecord) -> Self {
        let email = record.authoritative_email().map(str::to_lowercase);
        let email_local = email
            .as_deref()
            .map(|e| NameKey::new(email_local_part(e)))
            .unwrap_or_default();

        Self {
            full_name: normalize_name(&record.full_name()),
            first: NameKey::new(&record.first_name),
            last: NameKey::new(&record.last_name),
            display: NameKey::new(&record.display_name),
            email,
            email_local,
            phone: phone_digits(&record.phone),
            record,
        }
    }

    #[must_use]
    pub const fn record(&self) -> &PersonRecord {
        &self.record
    }
}

impl From<PersonRecord> for PreparedRecord {
    fn from(record: PersonRecord) -> Self {
        Self::new(record)
    }
}

impl From<&PersonRecord> for PreparedRecord {
    fn from(record: &PersonRecord) -> Self {
        Self::new(record.clone())
    }
}

/// Full breakdown of one pair, produced regardless of the threshold.
#[derive(Debug, Clone, Serialize)]
pub struct PairExplanation {
    pub source: PersonRecord,
    pub candidate: PersonRecord,
    pub first_name: SimilarityResult,
    pub last_name: SimilarityResult,
    pub display_name: SimilarityResult,
    /// Signals that fired, in evaluation order
    pub hits: Vec<SignalHit>,
    /// Sum of points before clamping
    pub raw_total: u32,
    /// `min(raw_total, 100)`
    pub confidence: u8,
    pub threshold: u8,
}

impl PairExplanation {
    /// Whether the pair would be reported at the configured threshold.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.confidence >= self.threshold
    }

    /// Reason strings in evaluation order.
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.hits.iter().map(|h| h.reason.clone()).collect()
    }

    /// One-line summary of the outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} vs {}: confidence {} (raw {}, threshold {}) -> {}",
            self.source.label(),
            self.candidate.label(),
            self.confidence,
            self.raw_total,
            self.threshold,
            if self.is_match() { "match" } else { "no match" }
        )
    }
}

/// Scores pairs of person records.
///
/// Scoring is a pure function of the two records and the configuration;
/// the scorer holds no mutable state and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct PairScorer {
    config: ScoringConfig,
}

impl PairScorer {
    #[must_use]
    pub const fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scorer with the default point table and the given threshold.
    #[must_use]
    pub fn with_threshold(threshold: u8) -> Self {
        Self::new(ScoringConfig::default().with_threshold(threshold))
    }

    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.config.threshold
    }

    /// Score a pair; `None` when the confidence is below the threshold.
    #[must_use]
    pub fn score(&self, source: &PersonRecord, candidate: &PersonRecord) -> Option<MatchCandidate> {
        self.score_prepared(&PreparedRecord::from(source), &PreparedRecord::from(candidate))
    }

    /// Score a pair of prepared records.
    #[must_use]
    pub fn score_prepared(
        &self,
        source: &PreparedRecord,
        candidate: &PreparedRecord,
    ) -> Option<MatchCandidate> {
        let evaluation = self.evaluate(source, candidate);
        let confidence = clamp_confidence(evaluation.raw_total());
        if confidence < self.config.threshold {
            return None;
        }
        Some(MatchCandidate {
            confidence,
            reasons: evaluation.hits.into_iter().map(|h| h.reason).collect(),
            source: source.record.clone(),
            candidate: candidate.record.clone(),
        })
    }

    /// Break a pair down into every signal, ignoring the threshold.
    #[must_use]
    pub fn explain(&self, source: &PersonRecord, candidate: &PersonRecord) -> PairExplanation {
        let source = PreparedRecord::from(source);
        let candidate = PreparedRecord::from(candidate);
        let evaluation = self.evaluate(&source, &candidate);
        let raw_total = evaluation.raw_total();

        PairExplanation {
            first_name: evaluation.first_name,
            last_name: evaluation.last_name,
            display_name: evaluation.display_name,
            hits: evaluation.hits,
            raw_total,
            confidence: clamp_confidence(raw_total),
            threshold: self.config.threshold,
            source: source.record,
            candidate: candidate.record,
        }
    }

    fn evaluate(&self, a: &PreparedRecord, b: &PreparedRecord) -> Evaluation {
        let points = &self.config.points;
        let (ra, rb) = (&a.record, &b.record);
        let mut hits = HitList::new(points);

        // Full name
        if !a.full_name.is_empty() && a.full_name == b.full_name {
            hits.push(
                Signal::FullNameExact,
                format!("{}: {} vs {}", Signal::FullNameExact, ra.full_name(), rb.full_name()),
            );
        }

        // First name
        let first_name = a.first.compare(&b.first);
        hits.push_name_tiers(
            [Signal::FirstNameHigh, Signal::FirstNameSimilar, Signal::FirstNamePhonetic],
            &first_name,
            &ra.first_name,
            &rb.first_name,
        );

        // Last name
        let last_name = a.last.compare(&b.last);
        hits.push_name_tiers(
            [Signal::LastNameHigh, Signal::LastNameSimilar, Signal::LastNamePhonetic],
            &last_name,
            &ra.last_name,
            &rb.last_name,
        );

        // Display name
        let display_name = a.display.compare(&b.display);
        if display_name.edit_distance_pct >= points.high_cutoff {
            hits.push(
                Signal::DisplayNameHigh,
                with_pct(Signal::DisplayNameHigh, &ra.display_name, &rb.display_name, display_name.edit_distance_pct),
            );
        }

        // Email
        if let (Some(email_a), Some(email_b)) = (&a.email, &b.email) {
            if email_a == email_b {
                hits.push(
                    Signal::EmailExact,
                    format!("{}: {} vs {}", Signal::EmailExact, ra.email.trim(), rb.email.trim()),
                );
            } else {
                let local = a.email_local.compare(&b.email_local);
                if local.edit_distance_pct >= points.related_cutoff {
                    hits.push(
                        Signal::EmailLocalSimilar,
                        with_pct(
                            Signal::EmailLocalSimilar,
                            email_local_part(ra.email.trim()),
                            email_local_part(rb.email.trim()),
                            local.edit_distance_pct,
                        ),
                    );
                }
            }
        }

        // Phone
        if !a.phone.is_empty() && a.phone == b.phone {
            hits.push(
                Signal::PhoneExact,
                format!("{}: {} vs {}", Signal::PhoneExact, ra.phone, rb.phone),
            );
        }

        // Inversion
        let crossed_first = a.first.compare(&b.last);
        let crossed_last = a.last.compare(&b.first);
        if crossed_first.edit_distance_pct >= points.related_cutoff
            && crossed_last.edit_distance_pct >= points.related_cutoff
        {
            hits.push(
                Signal::NameInversion,
                format!(
                    "{}: {} {} vs {} {}",
                    Signal::NameInversion,
                    ra.first_name,
                    ra.last_name,
                    rb.first_name,
                    rb.last_name
                ),
            );
        }

        // Nickname
        if are_nickname_variants(&ra.first_name, &rb.first_name)
            && last_name.edit_distance_pct >= points.related_cutoff
        {
            hits.push(
                Signal::Nickname,
                format!("{}: {} vs {}", Signal::Nickname, ra.first_name, rb.first_name),
            );
        }

        Evaluation {
            first_name,
            last_name,
            display_name,
            hits: hits.into_inner(),
        }
    }
}

/// Score one pair with the default point table.
///
/// ```
/// use person_dedupe::matching::score_pair;
/// use person_dedupe::model::PersonRecord;
///
/// let a = PersonRecord::new(1).with_name("Smith", "John");
/// let b = PersonRecord::new(2).with_name("John", "Smith");
/// let hit = score_pair(&a, &b, 10).expect("inversion fires");
/// assert_eq!(hit.confidence, 15);
/// assert!(score_pair(&a, &b, 40).is_none());
/// ```
#[must_use]
pub fn score_pair(
    source: &PersonRecord,
    candidate: &PersonRecord,
    threshold: u8,
) -> Option<MatchCandidate> {
    PairScorer::with_threshold(threshold).score(source, candidate)
}

fn clamp_confidence(raw_total: u32) -> u8 {
    // min(100) fits in u8
    raw_total.min(100) as u8
}

fn with_pct(signal: Signal, a: &str, b: &str, pct: f64) -> String {
    format!("{signal}: {a} vs {b} ({pct}%)")
}

struct Evaluation {
    first_name: SimilarityResult,
    last_name: SimilarityResult,
    display_name: SimilarityResult,
    hits: Vec<SignalHit>,
}

impl Evaluation {
    fn raw_total(&self) -> u32 {
        self.hits.iter().map(|h| h.points).sum()
    }
}

struct HitList<'a> {
    points: &'a SignalPoints,
    hits: Vec<SignalHit>,
}

impl<'a> HitList<'a> {
    const fn new(points: &'a SignalPoints) -> Self {
        Self {
            points,
            hits: Vec::new(),
        }
    }

    fn push(&mut self, signal: Signal, reason: String) {
        self.hits.push(SignalHit {
            signal,
            points: signal.points(self.points),
            reason,
        });
    }

    /// High / similar / phonetic tiers; at most one fires.
    fn push_name_tiers(&mut self, tiers: [Signal; 3], sim: &SimilarityResult, a: &str, b: &str) {
        let [high, similar, phonetic] = tiers;
        if sim.edit_distance_pct >= self.points.high_cutoff {
            self.push(high, with_pct(high, a, b, sim.edit_distance_pct));
        } else if sim.edit_distance_pct >= self.points.similar_cutoff {
            self.push(similar, with_pct(similar, a, b, sim.edit_distance_pct));
        } else if sim.metaphone_equal {
            self.push(phonetic, format!("{phonetic}: {a} vs {b}"));
        }
    }

    fn into_inner(self) -> Vec<SignalHit> {
        self.hits
    }
}
