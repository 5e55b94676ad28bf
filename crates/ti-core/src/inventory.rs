//! Point-in-time facts keyed by subject.
//!
//! Two-level map: subject key (a host, a config file, a component) to an
//! [`Item`], which maps field names to JSON values. Writes merge: setting a
//! field on a known subject leaves that subject's other fields alone, and
//! the last write to a (subject, field) pair wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields recorded for one subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(BTreeMap<String, Value>);

impl Item {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Inventory store: subject key to [`Item`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, Item>);

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `field` for subject `key`, creating the subject
    /// if needed. Never fails.
    pub fn set_item(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.0
            .entry(key.into())
            .or_default()
            .0
            .insert(field.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Item> {
        self.0.get(key)
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Item)> {
        self.0.iter()
    }
}
