//! Pipeline orchestration for scans.
//!
//! Shared load → scan → report logic used by the CLI command handlers.
//! The scoring core in [`crate::matching`] and [`crate::batch`] never touches
//! the filesystem; everything with side effects lives here.

mod load;
mod output;
mod report_stage;
mod scanner;
mod state;

pub use load::{load_records, parse_records, LoadedRecords};
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::{output_explain_report, output_scan_report};
pub use scanner::{ScanLimits, ScanOutcome, Scanner, StopReason};
pub use state::{scan_fingerprint, MatchMap, ScanState, STATE_VERSION};

/// Exit codes for scripted use
pub mod exit_codes {
    /// Scan finished (no matches, or --fail-on-match not set)
    pub const SUCCESS: i32 = 0;
    /// Matches found and --fail-on-match set
    pub const MATCHES_FOUND: i32 = 1;
    /// Scan stopped early; run again with the same state file
    pub const SCAN_INCOMPLETE: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::MATCHES_FOUND, 1);
        assert_eq!(exit_codes::SCAN_INCOMPLETE, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }
}
