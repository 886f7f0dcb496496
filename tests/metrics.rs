//! Tests for the metrics module.

use anyhow::Result;
use ironbrc::metrics::{names, CounterMetric, GaugeMetric, Metric, MetricsCollector};
use serde_json::json;
use std::thread;

#[test]
fn test_counter_metric() {
    let collector = MetricsCollector::new();
    collector.register(Box::new(CounterMetric::with_value("test_counter", 5)));

    let snapshot = collector.snapshot();
    assert_eq!(snapshot.get("test_counter"), Some(&json!(5)));
    assert_eq!(collector.counter("test_counter"), Some(5));
}

#[test]
fn test_gauge_metric() {
    let collector = MetricsCollector::new();
    collector.register(Box::new(
        GaugeMetric::new("throughput", 42.5).with_description("MiB/s"),
    ));

    let snapshot = collector.snapshot();
    assert_eq!(snapshot.get("throughput"), Some(&json!(42.5)));
    // Gauges are not counters.
    assert_eq!(collector.counter("throughput"), None);
}

#[test]
fn test_increment_counter() {
    let collector = MetricsCollector::new();
    collector.increment_counter(names::LINES, 1);
    collector.increment_counter(names::LINES, 5);
    assert_eq!(collector.counter(names::LINES), Some(6));
}

#[test]
fn test_set_counter_replaces_value() {
    let collector = MetricsCollector::new();
    collector.set_counter(names::STATIONS, 10);
    collector.set_counter(names::STATIONS, 3);
    assert_eq!(collector.counter(names::STATIONS), Some(3));
}

#[test]
fn test_concurrent_increments() {
    let collector = MetricsCollector::new();
    thread::scope(|s| {
        for _ in 0..8 {
            let c = collector.clone();
            s.spawn(move || {
                for _ in 0..1000 {
                    c.increment_counter(names::BYTES, 1);
                }
            });
        }
    });
    assert_eq!(collector.counter(names::BYTES), Some(8000));
}

#[test]
fn test_timing() {
    let collector = MetricsCollector::new();
    assert!(collector.elapsed().is_none());
    collector.record_start();
    assert!(collector.elapsed().is_none());
    collector.record_end();
    assert!(collector.elapsed().is_some());
}

#[test]
fn test_to_json() {
    let collector = MetricsCollector::new();
    collector.register(Box::new(CounterMetric::with_value("count", 100)));
    collector.register(Box::new(
        GaugeMetric::new("gauge", 1.5).with_description("A gauge"),
    ));
    collector.record_start();
    collector.record_end();

    let json = collector.to_json();
    assert_eq!(json["count"]["value"], json!(100));
    assert_eq!(json["gauge"]["value"], json!(1.5));
    assert_eq!(json["gauge"]["description"], json!("A gauge"));
    assert!(json["execution_time_ms"]["value"].is_u64());
}

#[test]
fn test_write_summary_sorted() -> Result<()> {
    let collector = MetricsCollector::new();
    collector.set_counter(names::WORKERS, 4);
    collector.set_counter(names::LINES, 10);
    collector.register(Box::new(
        GaugeMetric::new("throughput", 2.0).with_description("MiB/s"),
    ));

    let mut out = Vec::new();
    collector.write_summary(&mut out)?;
    let text = String::from_utf8(out)?;
    assert_eq!(text, "lines: 10\nthroughput: 2.0 (MiB/s)\nworkers: 4\n");
    Ok(())
}

#[test]
fn test_save_to_file() -> Result<()> {
    let collector = MetricsCollector::new();
    collector.set_counter(names::PARTITIONS, 7);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("metrics.json");
    collector.save_to_file(&path)?;

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(saved["partitions"]["value"], json!(7));
    Ok(())
}

#[test]
fn test_custom_metric() {
    struct Constant;

    impl Metric for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn value(&self) -> serde_json::Value {
            json!("x")
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let collector = MetricsCollector::default();
    collector.register(Box::new(Constant));
    assert_eq!(collector.snapshot()["constant"], json!("x"));
    assert_eq!(CounterMetric::with_value("zero", 0).value(), json!(0));
}
