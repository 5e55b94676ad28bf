//! RATE/DELTA metrics computed across two simulated runs sharing a cache file.

use serde_json::json;
use tempfile::TempDir;
use ti_cache::{Cache, FileCache};
use ti_metric::{MetricSet, MetricSetWriter, Recorded, SourceType};

fn run_once(path: &std::path::Path, bytes: f64, now_ms: i64) -> (MetricSet, Recorded) {
    let mut cache = FileCache::open(path);
    cache.status().unwrap();

    let mut set = MetricSet::new("NetworkSample");
    let recorded = {
        let mut writer = MetricSetWriter::new(&mut set, &mut cache);
        writer.set_attribute("interface", "eth0").unwrap();
        writer
            .set_metric_at("receiveBytesPerSecond", bytes, SourceType::Rate, now_ms)
            .unwrap()
    };
    cache.save().unwrap();
    (set, recorded)
}

#[test]
fn rate_is_derived_from_previous_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("net.json");

    let (first, recorded) = run_once(&path, 10_000.0, 1_000_000);
    assert_eq!(recorded, Recorded::Primed);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        json!({"event_type": "NetworkSample", "interface": "eth0"})
    );

    let (second, recorded) = run_once(&path, 25_000.0, 1_010_000);
    assert_eq!(recorded, Recorded::Stored(json!(1_500.0)));
    assert_eq!(second.get("receiveBytesPerSecond"), Some(&json!(1_500.0)));
}

#[test]
fn entities_keep_separate_history() {
    let dir = TempDir::new().unwrap();
    let mut cache = FileCache::open(dir.path().join("disk.json"));

    for (device, reads) in [("sda", 100.0), ("sdb", 5_000.0)] {
        let mut set = MetricSet::new("DiskSample");
        let mut writer = MetricSetWriter::new(&mut set, &mut cache);
        writer.set_attribute("device", device).unwrap();
        assert_eq!(
            writer.set_metric_at("reads", reads, SourceType::Delta, 0).unwrap(),
            Recorded::Primed
        );
    }

    let mut set = MetricSet::new("DiskSample");
    let mut writer = MetricSetWriter::new(&mut set, &mut cache);
    writer.set_attribute("device", "sda").unwrap();
    assert_eq!(
        writer.set_metric_at("reads", 150.0, SourceType::Delta, 1_000).unwrap(),
        Recorded::Stored(json!(50.0))
    );
}
