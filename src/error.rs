//! Unified error types for person-dedupe.
//!
//! The scoring core is total and never fails; these errors cover the
//! driver layer: loading record dumps, persisting scan state, writing
//! reports and validating configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for person-dedupe operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DedupeError {
    /// Errors while reading or decoding a record dump
    #[error("Failed to load records: {context}")]
    Input {
        context: String,
        #[source]
        source: InputErrorKind,
    },

    /// Errors while running or resuming a scan
    #[error("Scan failed: {context}")]
    Scan {
        context: String,
        #[source]
        source: ScanErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific input error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InputErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON array of records or an object with a \"records\" array")]
    UnexpectedShape,

    #[error("Record {index} has no usable id")]
    MissingId { index: usize },
}

/// Specific scan error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScanErrorKind {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("State file is corrupt: {0}")]
    CorruptState(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("Formatting failed: {0}")]
    FormatError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for person-dedupe operations
pub type Result<T> = std::result::Result<T, DedupeError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DedupeError {
    /// Create an input error with context
    pub fn input(context: impl Into<String>, source: InputErrorKind) -> Self {
        Self::Input {
            context: context.into(),
            source,
        }
    }

    /// Create a scan error with context
    pub fn scan(context: impl Into<String>, source: ScanErrorKind) -> Self {
        Self::Scan {
            context: context.into(),
            source,
        }
    }

    /// Create a report error with context
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DedupeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DedupeError {
    fn from(err: serde_json::Error) -> Self {
        Self::input(
            "JSON deserialization",
            InputErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<crate::reports::ReportError> for DedupeError {
    fn from(err: crate::reports::ReportError) -> Self {
        use crate::reports::ReportError;
        match err {
            ReportError::IoError(e) => e.into(),
            ReportError::SerializationError(msg) => Self::report(
                "rendering report",
                ReportErrorKind::JsonSerializationError(msg),
            ),
            ReportError::FormatError(e) => Self::report(
                "rendering report",
                ReportErrorKind::FormatError(e.to_string()),
            ),
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain: adding "loading sources" to an error whose
/// context is "JSON deserialization" yields
/// "loading sources: JSON deserialization".
///
/// # Example
///
/// ```ignore
/// use person_dedupe::error::ErrorContext;
///
/// let content = std::fs::read_to_string(path).context("reading record dump")?;
/// let records = parse_records(&content)
///     .with_context(|| format!("parsing {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DedupeError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DedupeError, new_ctx: &str) -> DedupeError {
    match err {
        DedupeError::Input {
            context: existing,
            source,
        } => DedupeError::Input {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DedupeError::Scan {
            context: existing,
            source,
        } => DedupeError::Scan {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DedupeError::Report {
            context: existing,
            source,
        } => DedupeError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DedupeError::Io {
            path,
            message,
            source,
        } => DedupeError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DedupeError::Config(msg) => DedupeError::Config(chain_context(new_ctx, &msg)),
        DedupeError::Validation(msg) => DedupeError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Join a new context onto an existing one as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
