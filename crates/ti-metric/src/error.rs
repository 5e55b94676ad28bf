//! Error types for metric recording.

use thiserror::Error;

/// Errors that can occur while recording a metric sample.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// NaN or infinite samples cannot be emitted
    #[error("metric '{name}' has a non-finite value")]
    NonFinite { name: String },

    /// Counter went backwards, usually a restart of the monitored service
    #[error("metric '{name}' decreased from {previous} to {current}")]
    NegativeDelta {
        name: String,
        previous: f64,
        current: f64,
    },

    /// Two samples share a timestamp, so no rate can be derived
    #[error("metric '{name}' has no elapsed time since its previous sample")]
    NoElapsedTime { name: String },

    /// Name collides with the reserved event type field
    #[error("'{0}' is a reserved field name")]
    ReservedName(String),
}

/// Result type alias for metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;
