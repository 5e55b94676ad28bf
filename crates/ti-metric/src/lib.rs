//! Metric sets for telemetry integrations.
//!
//! A [`MetricSet`] is one batch of samples for a single event type. Sets are
//! created by the aggregator, handed back to the integration through a
//! [`MetricSetWriter`], and emitted as flat JSON objects:
//!
//! ```json
//! {"event_type": "RedisSample", "net.bytesIn": 12.5, "role": "primary"}
//! ```
//!
//! RATE and DELTA metrics are computed against the previous run's sample,
//! which is kept in the run-state cache.

pub mod error;
pub mod set;
pub mod source;

pub use error::{MetricError, Result};
pub use set::{MetricSet, MetricSetWriter, Recorded, EVENT_TYPE_FIELD};
pub use source::SourceType;
