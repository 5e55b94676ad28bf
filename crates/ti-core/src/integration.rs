//! The aggregator one integration process publishes through.
//!
//! An [`Integration`] accumulates inventory, metric sets and events for one
//! cycle, then [`Integration::publish`] writes them as a single JSON
//! document on stdout and clears the containers for the next cycle.
//!
//! ```no_run
//! use ti_core::{Integration, NoArgs, SourceType};
//!
//! let (mut integration, _) = Integration::new::<NoArgs>("com.example.redis", "1.0.0")?;
//! integration.set_item("redis:6379", "version", "7.2.4");
//! integration
//!     .new_metric_set("RedisSample")
//!     .set_metric("net.connectedClients", 12.0, SourceType::Gauge)?;
//! integration.add_notification_event("redis restarted")?;
//! integration.publish()?;
//! # Ok::<(), ti_core::Error>(())
//! ```

use clap::Args;
use serde_json::Value;
use std::ffi::OsString;
use std::io::Write;
use ti_cache::{Cache, FileCache};
use ti_metric::{MetricSet, MetricSetWriter};

use crate::args::{DefaultArgs, IntegrationArgs};
use crate::error::Result;
use crate::event::{Event, EventLog};
use crate::inventory::Inventory;
use crate::logging::generate_run_id;
use crate::publish::{self, PublishPipeline};

/// Output protocol understood by the host agent.
pub const PROTOCOL_VERSION: &str = "1";

/// Accumulated observations plus the identity they are published under.
pub struct Integration {
    pub(crate) name: String,
    pub(crate) integration_version: String,
    pub(crate) metrics: Vec<MetricSet>,
    pub(crate) inventory: Inventory,
    pub(crate) events: EventLog,
    pub(crate) pretty_output: bool,
    pub(crate) cache: Box<dyn Cache>,
    pub(crate) run_id: String,
    args: DefaultArgs,
}

impl Integration {
    /// Build from the process arguments with the default on-disk cache.
    ///
    /// Returns the integration together with its parsed custom arguments.
    pub fn new<A: Args>(name: &str, version: &str) -> Result<(Self, A)> {
        Self::builder(name, version).build()
    }

    pub fn builder(name: &str, version: &str) -> IntegrationBuilder {
        IntegrationBuilder {
            name: name.to_string(),
            version: version.to_string(),
            args: None,
            cache: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn protocol_version(&self) -> &str {
        PROTOCOL_VERSION
    }

    pub fn integration_version(&self) -> &str {
        &self.integration_version
    }

    /// Correlation ID for this process's diagnostics. Never published.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn args(&self) -> &DefaultArgs {
        &self.args
    }

    pub fn pretty_output(&self) -> bool {
        self.pretty_output
    }

    pub fn set_pretty_output(&mut self, pretty: bool) {
        self.pretty_output = pretty;
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn metrics(&self) -> &[MetricSet] {
        &self.metrics
    }

    pub fn cache(&self) -> &dyn Cache {
        &*self.cache
    }

    pub fn cache_mut(&mut self) -> &mut dyn Cache {
        &mut *self.cache
    }

    /// Record an inventory fact. Merges into an existing subject.
    pub fn set_item(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.inventory.set_item(key, field, value);
    }

    /// Append a new metric set and return a handle for populating it.
    pub fn new_metric_set(&mut self, event_type: &str) -> MetricSetWriter<'_> {
        let index = self.metrics.len();
        self.metrics.push(MetricSet::new(event_type));
        MetricSetWriter::new(&mut self.metrics[index], &mut *self.cache)
    }

    pub fn add_event(&mut self, event: Event) -> Result<()> {
        self.events.add(event)
    }

    pub fn add_notification_event(&mut self, summary: impl Into<String>) -> Result<()> {
        self.events.add_notification(summary)
    }

    /// Persist the cache, write the document to stdout, then clear.
    pub fn publish(&mut self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.publish_to(&mut out)
    }

    /// Same as [`Integration::publish`] against any sink.
    pub fn publish_to<W: Write>(&mut self, out: &mut W) -> Result<()> {
        PublishPipeline::new(out).run(self)
    }

    /// The document `publish` would emit, without the trailing newline.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        publish::render(self, pretty)
    }

    /// Drop all accumulated data. Identity and output settings are kept.
    pub fn clear(&mut self) {
        self.inventory = Inventory::new();
        self.metrics = Vec::new();
        self.events = EventLog::new();
    }
}

impl std::fmt::Debug for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("name", &self.name)
            .field("integration_version", &self.integration_version)
            .field("metrics", &self.metrics.len())
            .field("inventory", &self.inventory.len())
            .field("events", &self.events.len())
            .field("pretty_output", &self.pretty_output)
            .field("run_id", &self.run_id)
            .finish_non_exhaustive()
    }
}

/// Staged construction of an [`Integration`].
pub struct IntegrationBuilder {
    name: String,
    version: String,
    args: Option<Vec<OsString>>,
    cache: Option<Box<dyn Cache>>,
}

impl IntegrationBuilder {
    /// Parse these arguments instead of the process's. The first item is
    /// the program name.
    pub fn args_from<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Use `cache` instead of the integration's default cache file.
    pub fn cache(mut self, cache: impl Cache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Parse arguments, check the cache, and assemble the integration.
    ///
    /// Fails on malformed arguments or an unusable cache; in both cases no
    /// integration is returned.
    pub fn build<A: Args>(self) -> Result<(Integration, A)> {
        let argv = self.args.unwrap_or_else(|| std::env::args_os().collect());
        let parsed = IntegrationArgs::<A>::parse_for(&self.name, &self.version, argv)?;

        let mut cache = self
            .cache
            .unwrap_or_else(|| Box::new(FileCache::for_integration(&self.name)) as Box<dyn Cache>);
        cache.set_debug(parsed.defaults.verbose);
        cache.status()?;

        let run_id = generate_run_id();
        tracing::debug!(
            run_id = %run_id,
            integration = %self.name,
            version = %self.version,
            pretty = parsed.defaults.pretty,
            "integration ready"
        );

        let integration = Integration {
            name: self.name,
            integration_version: self.version,
            metrics: Vec::new(),
            inventory: Inventory::new(),
            events: EventLog::new(),
            pretty_output: parsed.defaults.pretty,
            cache,
            run_id,
            args: parsed.defaults,
        };
        Ok((integration, parsed.extra))
    }
}
