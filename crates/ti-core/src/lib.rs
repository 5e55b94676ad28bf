//! Telemetry integration core.
//!
//! An integration is a short-lived process the host agent spawns on an
//! interval. During one run it accumulates:
//! - Inventory: point-in-time facts, merged per subject
//! - Metrics: batches of samples, one [`MetricSet`] per entity and event type
//! - Events: one-off notifications
//!
//! and publishes them as a single JSON document on stdout. Diagnostics go
//! to stderr through `tracing`; see [`logging`].

pub mod args;
pub mod error;
pub mod event;
pub mod exit_codes;
pub mod integration;
pub mod inventory;
pub mod logging;
pub mod publish;

pub use args::{DefaultArgs, IntegrationArgs, NoArgs};
pub use error::{format_error_human, Error, ErrorCategory, Result};
pub use event::{Event, EventLog, DEFAULT_EVENT_CATEGORY};
pub use exit_codes::ExitCode;
pub use integration::{Integration, IntegrationBuilder, PROTOCOL_VERSION};
pub use inventory::{Inventory, Item};
pub use publish::{Document, PublishPipeline, Stage, EMPTY_DOCUMENT};

pub use ti_cache::{Cache, CacheError, CachedSample, FileCache, MemoryCache};
pub use ti_metric::{MetricError, MetricSet, MetricSetWriter, Recorded, SourceType};
