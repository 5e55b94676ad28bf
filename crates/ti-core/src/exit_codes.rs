//! Exit codes for integration binaries.
//!
//! Exit code ranges:
//! - 0: Published successfully
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use crate::error::{Error, ErrorCategory};

/// Exit codes for integration runs.
///
/// These codes are a stable contract for the host agent. Changes require
/// a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Data collected and published
    Clean = 0,

    /// Invalid arguments or environment
    ArgsError = 10,

    /// Run-state cache missing, corrupted, or not writable
    CacheError = 11,

    /// Collected data was rejected
    DataError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// Output could not be written
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Config => ExitCode::ArgsError,
            ErrorCategory::Cache => ExitCode::CacheError,
            ErrorCategory::Validation => ExitCode::DataError,
            ErrorCategory::Output => match err {
                Error::Emit(_) => ExitCode::IoError,
                _ => ExitCode::InternalError,
            },
        }
    }
}
