//! Metric set storage and the writer handed to integrations.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use ti_cache::{Cache, CachedSample};

use crate::error::{MetricError, Result};
use crate::source::SourceType;

/// Key under which the event type is emitted.
pub const EVENT_TYPE_FIELD: &str = "event_type";

/// One batch of samples for a single event type.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    event_type: String,
    fields: BTreeMap<String, Value>,
    attributes: BTreeSet<String>,
}

/// Outcome of recording a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// The value now present in the set.
    Stored(Value),
    /// First sighting of a RATE/DELTA metric; cached, nothing emitted yet.
    Primed,
}

impl MetricSet {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            fields: BTreeMap::new(),
            attributes: BTreeSet::new(),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of recorded metrics and attributes, excluding the event type.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Cache key for a cumulative metric.
    ///
    /// Attributes are folded in as `name=value` segments (in name order) so
    /// two sets of the same event type describing different entities keep
    /// separate history. `\`, `:` and `=` are escaped in every component,
    /// so a value can never forge a segment boundary.
    pub fn sample_key(&self, name: &str) -> String {
        let mut key = escape_key_part(&self.event_type);
        for attr in &self.attributes {
            if let Some(Value::String(v)) = self.fields.get(attr) {
                key.push_str("::");
                key.push_str(&escape_key_part(attr));
                key.push('=');
                key.push_str(&escape_key_part(v));
            }
        }
        key.push_str("::");
        key.push_str(&escape_key_part(name));
        key
    }

    fn check_name(name: &str) -> Result<()> {
        if name == EVENT_TYPE_FIELD {
            return Err(MetricError::ReservedName(name.to_string()));
        }
        Ok(())
    }

    fn store_attribute(&mut self, name: &str, value: String) -> Value {
        let value = Value::String(value);
        self.attributes.insert(name.to_string());
        self.fields.insert(name.to_string(), value.clone());
        value
    }

    fn store_number(&mut self, name: &str, value: f64) -> Result<Value> {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| MetricError::NonFinite {
            name: name.to_string(),
        })?;
        let value = Value::Number(number);
        self.attributes.remove(name);
        self.fields.insert(name.to_string(), value.clone());
        Ok(value)
    }
}

fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | ':' | '=') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(EVENT_TYPE_FIELD, &self.event_type)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Mutable handle to a metric set that lives inside an aggregator.
///
/// Borrows the run-state cache for the duration of population so RATE and
/// DELTA samples can be computed against the previous run.
pub struct MetricSetWriter<'a> {
    set: &'a mut MetricSet,
    cache: &'a mut dyn Cache,
}

impl<'a> MetricSetWriter<'a> {
    pub fn new(set: &'a mut MetricSet, cache: &'a mut dyn Cache) -> Self {
        Self { set, cache }
    }

    pub fn metric_set(&self) -> &MetricSet {
        self.set
    }

    /// Record a descriptive string value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        MetricSet::check_name(name)?;
        self.set.store_attribute(name, value.into());
        Ok(())
    }

    /// Record a sample stamped with the current time.
    pub fn set_metric(&mut self, name: &str, value: f64, source: SourceType) -> Result<Recorded> {
        self.set_metric_at(name, value, source, chrono::Utc::now().timestamp_millis())
    }

    /// Record a sample observed at `now_ms` (milliseconds since the epoch).
    pub fn set_metric_at(
        &mut self,
        name: &str,
        value: f64,
        source: SourceType,
        now_ms: i64,
    ) -> Result<Recorded> {
        MetricSet::check_name(name)?;
        if !value.is_finite() {
            return Err(MetricError::NonFinite {
                name: name.to_string(),
            });
        }

        match source {
            SourceType::Gauge => self.set.store_number(name, value).map(Recorded::Stored),
            SourceType::Attribute => Ok(Recorded::Stored(
                self.set.store_attribute(name, value.to_string()),
            )),
            SourceType::Rate | SourceType::Delta => self.record_cumulative(name, value, source, now_ms),
        }
    }

    fn record_cumulative(
        &mut self,
        name: &str,
        value: f64,
        source: SourceType,
        now_ms: i64,
    ) -> Result<Recorded> {
        let key = self.set.sample_key(name);
        let previous = self.cache.get(&key);
        self.cache.set(&key, CachedSample::new(value, now_ms));

        let Some(previous) = previous else {
            tracing::debug!(key = %key, "no previous sample; primed");
            return Ok(Recorded::Primed);
        };

        let delta = value - previous.value;
        if delta < 0.0 {
            return Err(MetricError::NegativeDelta {
                name: name.to_string(),
                previous: previous.value,
                current: value,
            });
        }

        let emitted = match source {
            SourceType::Delta => delta,
            _ => {
                let elapsed_ms = now_ms - previous.timestamp_ms;
                if elapsed_ms <= 0 {
                    return Err(MetricError::NoElapsedTime {
                        name: name.to_string(),
                    });
                }
                delta / (elapsed_ms as f64 / 1000.0)
            }
        };

        self.set.store_number(name, emitted).map(Recorded::Stored)
    }
}
