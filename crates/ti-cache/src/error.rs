//! Error types for cache operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, querying, or saving the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The on-disk cache could not be decoded when it was opened
    #[error("cache file {path} is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// The cache file was written by an incompatible version
    #[error("unsupported cache version: {version} (supported: {supported})")]
    UnsupportedVersion { version: u32, supported: u32 },

    /// No platform cache directory and no override
    #[error("no cache directory available; set TI_CACHE_DIR")]
    NoCacheDir,
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
