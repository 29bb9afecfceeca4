//! Identity matching engine for person records.
//!
//! This module scores how likely two person records denote the same
//! individual. It is built bottom-up from pure leaf utilities:
//!
//! - [`normalize_name`]: canonical lowercase alphanumeric form
//! - [`similarity`]: edit-distance, overlap and phonetic signals
//! - [`are_nickname_variants`]: fixed given-name diminutive table
//! - [`PairScorer`]: additive point table over all of the above
//!
//! Nothing here performs I/O or returns errors; degenerate input (empty
//! names, no email, no phone) simply fires fewer signals.
//!
//! # Example
//!
//! ```
//! use person_dedupe::matching::{PairScorer, ScoringConfig};
//! use person_dedupe::model::PersonRecord;
//!
//! let scorer = PairScorer::new(ScoringConfig::balanced());
//! let a = PersonRecord::new(1).with_name("Robert", "Smith").with_email("rsmith@uga.edu");
//! let b = PersonRecord::new(2).with_name("Bob", "Smith").with_email("RSmith@uga.edu");
//!
//! let hit = scorer.score(&a, &b).expect("above threshold");
//! assert_eq!(hit.confidence, 57);
//! ```

mod config;
pub mod nicknames;
mod normalize;
pub mod phonetic;
mod scoring;
pub mod string_similarity;

pub use config::{ScoringConfig, SignalPoints, PRESET_NAMES};
pub use nicknames::{are_nickname_variants, NicknameGroup, NicknameTable, BUILTIN_NICKNAMES};
pub use normalize::normalize_name;
pub use phonetic::{metaphone, soundex};
pub use scoring::{
    score_pair, PairExplanation, PairScorer, PreparedRecord, Signal, SignalHit,
};
pub use string_similarity::{
    edit_distance_pct, similar_text, similar_text_pct, similarity, NameKey, SimilarityResult,
};
