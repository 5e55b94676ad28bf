//! Error types for telemetry integrations.
//!
//! Every failure is returned to the immediate caller; nothing in this crate
//! terminates the process. Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Cache Unavailable
//!   Reason: cache unavailable: cache file /tmp/x.json is corrupted: EOF while parsing
//!   Fix: Delete the integration's cache file or point TI_CACHE_DIR at a writable directory.
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ti_cache::CacheError;
use ti_metric::MetricError;

/// Result type alias for integration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Argument parsing and integration setup.
    Config,
    /// Run-state cache readiness and persistence.
    Cache,
    /// Rejected input data (events, metric samples).
    Validation,
    /// Encoding and writing the output document.
    Output,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Cache => write!(f, "cache"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Output => write!(f, "output"),
        }
    }
}

/// Unified error type for integrations.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid arguments: {0}")]
    Args(#[from] clap::Error),

    // Cache errors (20-29)
    #[error("cache unavailable: {0}")]
    CacheUnavailable(#[from] CacheError),

    // Validation errors (30-39)
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("metric rejected: {0}")]
    Metric(#[from] MetricError),

    // Output errors (40-49)
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to emit output: {0}")]
    Emit(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// - 10-19: Configuration errors
    /// - 20-29: Cache errors
    /// - 30-39: Validation errors
    /// - 40-49: Output errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Args(_) => 11,
            Error::CacheUnavailable(_) => 20,
            Error::Validation(_) => 30,
            Error::Metric(_) => 31,
            Error::Serialization(_) => 40,
            Error::Emit(_) => 41,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Args(_) => ErrorCategory::Config,
            Error::CacheUnavailable(_) => ErrorCategory::Cache,
            Error::Validation(_) | Error::Metric(_) => ErrorCategory::Validation,
            Error::Serialization(_) | Error::Emit(_) => ErrorCategory::Output,
        }
    }

    /// Whether retrying the failed operation can succeed without code changes.
    ///
    /// A failed publish never clears accumulated data, so output errors are
    /// retryable as a whole cycle.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::Args(_) => false,
            Error::CacheUnavailable(_) => true,
            // Only the offending call is rejected; earlier data is untouched.
            Error::Validation(_) | Error::Metric(_) => true,
            Error::Serialization(_) => true,
            Error::Emit(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::Args(_) => {
                "Check the integration's arguments and environment variables. Run with '--help' for usage."
            }
            Error::CacheUnavailable(_) => {
                "Delete the integration's cache file or point TI_CACHE_DIR at a writable directory."
            }
            Error::Validation(_) => "Events need a non-empty summary.",
            Error::Metric(_) => {
                "Counter resets and first samples are expected after restarts; the next run recovers."
            }
            Error::Serialization(_) => {
                "Remove the value that cannot be encoded as JSON and publish again."
            }
            Error::Emit(_) => "Check that the agent is still reading this integration's stdout.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::Args(_) => "Invalid Arguments",
            Error::CacheUnavailable(_) => "Cache Unavailable",
            Error::Validation(_) => "Validation Failed",
            Error::Metric(_) => "Metric Rejected",
            Error::Serialization(_) => "Serialization Failed",
            Error::Emit(_) => "Output Write Failed",
        }
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
