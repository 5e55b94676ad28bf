//! Discrete notification events.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category used by [`EventLog::add_notification`].
pub const DEFAULT_EVENT_CATEGORY: &str = "notifications";

/// A one-off message about a key activity on the monitored system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
}

impl Event {
    pub fn new(summary: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            category: category.into(),
        }
    }

    /// Event in the default category.
    pub fn notification(summary: impl Into<String>) -> Self {
        Self::new(summary, DEFAULT_EVENT_CATEGORY)
    }
}

/// Accepted events, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog(Vec<Event>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event`. An empty summary is rejected and the log is unchanged.
    pub fn add(&mut self, event: Event) -> Result<()> {
        if event.summary.is_empty() {
            return Err(Error::Validation(
                "summary of the event cannot be empty".to_string(),
            ));
        }
        self.0.push(event);
        Ok(())
    }

    pub fn add_notification(&mut self, summary: impl Into<String>) -> Result<()> {
        self.add(Event::notification(summary))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary_rejected() {
        let mut log = EventLog::new();
        log.add_notification("first").unwrap();

        let err = log.add(Event::new("", "alerts")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(log.len(), 1);

        assert!(log.add_notification("").is_err());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_notification_uses_default_category() {
        let mut a = EventLog::new();
        let mut b = EventLog::new();
        a.add_notification("restarted").unwrap();
        b.add(Event::new("restarted", "notifications")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_category_allowed_and_omitted() {
        let mut log = EventLog::new();
        log.add(Event::new("disk replaced", "")).unwrap();
        assert_eq!(
            serde_json::to_string(&log).unwrap(),
            r#"[{"summary":"disk replaced"}]"#
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut log = EventLog::new();
        for s in ["a", "b", "c"] {
            log.add_notification(s).unwrap();
        }
        let summaries: Vec<&str> = log.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["a", "b", "c"]);
    }
}
