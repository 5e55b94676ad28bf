//! Publish pipeline: persist → serialize → normalize → emit → reset.
//!
//! Stages run once, in order, and stop at the first failure. The reset
//! stage only runs after every earlier stage succeeded, so a failed publish
//! leaves the integration's data in place for inspection or a retry.

use serde::Serialize;
use std::io::Write;
use ti_cache::Cache;
use ti_metric::MetricSet;

use crate::error::{Error, Result};
use crate::event::EventLog;
use crate::integration::Integration;
use crate::inventory::Inventory;

/// Emitted in place of a document with nothing in it.
pub const EMPTY_DOCUMENT: &str = "[]";

/// Pipeline stage, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Persist,
    Serialize,
    Normalize,
    Emit,
    Reset,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Persist => write!(f, "persist"),
            Stage::Serialize => write!(f, "serialize"),
            Stage::Normalize => write!(f, "normalize"),
            Stage::Emit => write!(f, "emit"),
            Stage::Reset => write!(f, "reset"),
        }
    }
}

/// Wire form of an integration.
#[derive(Debug, Serialize)]
pub struct Document<'a> {
    pub name: &'a str,
    pub protocol_version: &'a str,
    pub integration_version: &'a str,
    pub metrics: &'a [MetricSet],
    pub inventory: &'a Inventory,
    pub events: &'a EventLog,
}

impl<'a> Document<'a> {
    pub fn of(integration: &'a Integration) -> Self {
        Document {
            name: &integration.name,
            protocol_version: integration.protocol_version(),
            integration_version: &integration.integration_version,
            metrics: &integration.metrics,
            inventory: &integration.inventory,
            events: &integration.events,
        }
    }

    /// No metrics, no inventory, no events.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.inventory.is_empty() && self.events.is_empty()
    }
}

/// Runs one publish against a sink.
pub struct PublishPipeline<'w, W: Write> {
    out: &'w mut W,
}

impl<'w, W: Write> PublishPipeline<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }

    pub fn run(self, integration: &mut Integration) -> Result<()> {
        let span = tracing::debug_span!("publish", run_id = %integration.run_id);
        let _guard = span.enter();

        persist(&mut *integration.cache).map_err(|e| failed(Stage::Persist, e))?;

        let text = render(integration, integration.pretty_output)?;

        emit(self.out, &text).map_err(|e| failed(Stage::Emit, e))?;

        integration.clear();
        tracing::debug!(stage = %Stage::Reset, bytes = text.len() + 1, "published");
        Ok(())
    }
}

/// Serialize and normalize stages.
pub fn render(integration: &Integration, pretty: bool) -> Result<String> {
    let document = Document::of(integration);
    let encoded = serialize(&document, pretty).map_err(|e| failed(Stage::Serialize, e))?;
    Ok(normalize_empty(&document, encoded))
}

fn failed(stage: Stage, err: Error) -> Error {
    tracing::warn!(stage = %stage, error = %err, "publish failed");
    err
}

fn persist(cache: &mut dyn Cache) -> Result<()> {
    cache.save()?;
    tracing::debug!(stage = %Stage::Persist, "cache saved");
    Ok(())
}

fn serialize(document: &Document<'_>, pretty: bool) -> Result<String> {
    if !pretty {
        return Ok(serde_json::to_string(document)?);
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| {
        use serde::ser::Error as _;
        Error::Serialization(serde_json::Error::custom(e))
    })
}

fn normalize_empty(document: &Document<'_>, encoded: String) -> String {
    if document.is_empty() || encoded == "null" {
        tracing::debug!(stage = %Stage::Normalize, "nothing to publish");
        return EMPTY_DOCUMENT.to_string();
    }
    encoded
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}
