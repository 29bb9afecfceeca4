//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs. Each one takes a fully merged
//! [`AppConfig`](crate::config::AppConfig) and returns the process exit code.

mod explain;
mod scan;

pub use explain::{run_explain, ExplainTarget};
pub use scan::{run_scan, ScanPaths};
