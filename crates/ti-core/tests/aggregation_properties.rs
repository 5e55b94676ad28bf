//! Property tests for inventory merging and event acceptance.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use ti_core::{Event, EventLog, Integration, Inventory, MemoryCache, NoArgs};

fn key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["host-1", "host-2", "db", "cache"]).prop_map(String::from)
}

fn field() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["cpu", "mem", "os", "version", "port"]).prop_map(String::from)
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z0-9.]{0,8}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn set_item_folds_last_write_wins(
        writes in prop::collection::vec((key(), field(), scalar()), 0..40)
    ) {
        let mut inventory = Inventory::new();
        let mut expected: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();

        for (k, f, v) in &writes {
            inventory.set_item(k.clone(), f.clone(), v.clone());
            expected.entry(k.clone()).or_default().insert(f.clone(), v.clone());
        }

        prop_assert_eq!(
            serde_json::to_value(&inventory).unwrap(),
            serde_json::to_value(&expected).unwrap()
        );
    }

    #[test]
    fn events_append_only_when_summary_non_empty(
        events in prop::collection::vec(("[a-z ]{0,6}", "[a-z]{0,4}"), 0..30)
    ) {
        let mut log = EventLog::new();
        let mut accepted = Vec::new();

        for (summary, category) in &events {
            let before = log.len();
            let event = Event::new(summary.clone(), category.clone());
            let result = log.add(event.clone());
            if summary.is_empty() {
                prop_assert!(result.is_err());
                prop_assert_eq!(log.len(), before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(log.len(), before + 1);
                prop_assert_eq!(log.as_slice().last(), Some(&event));
                accepted.push(summary.clone());
            }
        }

        let summaries: Vec<String> = log.iter().map(|e| e.summary.clone()).collect();
        prop_assert_eq!(summaries, accepted);
    }

    #[test]
    fn notification_equals_default_category(summary in "[a-z]{1,10}") {
        let mut a = EventLog::new();
        let mut b = EventLog::new();
        a.add_notification(summary.clone()).unwrap();
        b.add(Event::new(summary, "notifications")).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn published_inventory_round_trips(
        writes in prop::collection::vec((key(), field(), scalar()), 1..20),
        pretty in any::<bool>()
    ) {
        let (mut integration, _) = Integration::builder("com.example.prop", "0.0.1")
            .args_from(["prop"])
            .cache(MemoryCache::new())
            .build::<NoArgs>()
            .unwrap();
        integration.set_pretty_output(pretty);
        for (k, f, v) in &writes {
            integration.set_item(k.clone(), f.clone(), v.clone());
        }
        let before = serde_json::to_value(integration.inventory()).unwrap();

        let mut out = Vec::new();
        integration.publish_to(&mut out).unwrap();
        let doc: Value = serde_json::from_slice(&out).unwrap();

        prop_assert_eq!(&doc["inventory"], &before);
        prop_assert_eq!(&doc["metrics"], &json!([]));
        prop_assert_eq!(&doc["events"], &json!([]));
        prop_assert!(integration.inventory().is_empty());
    }
}
