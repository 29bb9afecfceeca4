//! **Duplicate person-record detection with fuzzy name, email and phone scoring.**
//!
//! `person-dedupe` compares identity records (staff directories, student
//! rosters, WordPress user exports) and reports pairs that probably describe
//! the same human. Each pair is scored against a fixed point table built from
//! normalized-name similarity, phonetic codes, a nickname table, email and
//! phone equality and first/last name inversion.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`PersonRecord`], [`RecordId`] and the [`MatchCandidate`]
//!   produced for every pair that clears the threshold.
//! - **[`matching`]**: name normalization, string similarity (edit distance
//!   percentage, common-substring overlap, Soundex, Metaphone), the nickname
//!   table and the [`PairScorer`].
//! - **[`batch`]**: the cross-product comparator. The pair space is flattened
//!   to a single offset so a scan can be split into chunks and resumed.
//! - **[`pipeline`]**: loading record dumps, persisting scan state and
//!   driving chunks under a time budget.
//! - **[`reports`]**: summary, JSON and CSV output.
//! - **[`config`]**: presets, YAML config files and validation.
//!
//! ## Scoring a Pair
//!
//! ```
//! use person_dedupe::{PairScorer, PersonRecord};
//!
//! let staff = PersonRecord::new(12)
//!     .with_name("Robert", "Smith")
//!     .with_email("rsmith@uga.edu")
//!     .with_phone("(706) 555-0100");
//! let student = PersonRecord::new(408)
//!     .with_name("Bob", "Smith")
//!     .with_email("RSmith@uga.edu")
//!     .with_phone("706.555.0100");
//!
//! let found = PairScorer::with_threshold(50).score(&staff, &student).unwrap();
//! assert_eq!(found.confidence, 77);
//! ```
//!
//! ## Resumable Scans
//!
//! ```no_run
//! use person_dedupe::batch::BatchOptions;
//! use person_dedupe::matching::ScoringConfig;
//! use person_dedupe::pipeline::{load_records, ScanLimits, Scanner};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let staff = load_records(Path::new("staff.json"))?;
//!     let students = load_records(Path::new("students.json"))?;
//!
//!     let limits = ScanLimits {
//!         time_budget: Some(Duration::from_secs(30)),
//!         ..ScanLimits::unbounded(500)
//!     };
//!     let mut scanner = Scanner::new(
//!         &staff.records,
//!         &students.records,
//!         ScoringConfig::strict(),
//!         BatchOptions::default(),
//!         limits,
//!     )?
//!     .with_state_file("scan-state.json")?;
//!
//!     let outcome = scanner.run()?;
//!     for found in &outcome.matches {
//!         println!("{} {} <-> {}", found.confidence, found.source.label(), found.candidate.label());
//!     }
//!     if !outcome.is_complete() {
//!         println!("run again to continue");
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Percentages and progress ratios cast between usize, u8, u32 and f64;
    // all values are bounded
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    // Variable names like `first_a`/`first_b` are clear in context
    clippy::similar_names
)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod pipeline;
pub mod reports;
pub mod utils;

// Re-export main types for convenience
pub use batch::{compare_all, CompareMode, PreparedBatch, ScanCursor};
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset, ConfigError, Validatable};
pub use error::{DedupeError, ErrorContext, Result};
pub use matching::{
    are_nickname_variants, metaphone, normalize_name, score_pair, similar_text, soundex,
    PairExplanation, PairScorer, ScoringConfig, Signal,
};
pub use model::{MatchCandidate, PersonRecord, RecordId};
pub use reports::{ReportFormat, ReportGenerator};
