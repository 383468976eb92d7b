use super::*;

fn empty_snapshot() -> MetricsSnapshot {
    EngineMetrics::new().snapshot()
}

#[test]
fn test_metrics_new() {
    let metrics = EngineMetrics::new();
    assert_eq!(metrics.frames.load(Ordering::Relaxed), 0);
    assert_eq!(metrics.enabled_for_ms(), 0);
}

#[test]
fn test_record_batch_and_gc() {
    let metrics = EngineMetrics::new();
    metrics.record_batch(12);
    metrics.record_batch(0);
    metrics.record_gc(5);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.mutation_batches, 2);
    assert_eq!(snapshot.items_observed, 12);
    assert_eq!(snapshot.gc_runs, 1);
    assert_eq!(snapshot.gc_evicted, 5);
}

#[test]
fn test_coalescing_ratio() {
    let mut snapshot = empty_snapshot();
    assert_eq!(snapshot.coalescing_ratio(), 0.0);

    snapshot.global_passes = 2;
    snapshot.global_coalesced = 6;
    assert_eq!(snapshot.coalescing_ratio(), 4.0);
}

#[test]
fn test_writes_per_pass() {
    let mut snapshot = empty_snapshot();
    assert_eq!(snapshot.writes_per_pass(), 0.0);

    snapshot.local_passes = 3;
    snapshot.global_passes = 1;
    snapshot.tracked_writes = 20;
    assert_eq!(snapshot.writes_per_pass(), 5.0);
}

#[test]
fn test_enabled_marker() {
    let metrics = EngineMetrics::new();
    metrics.mark_enabled();
    metrics.mark_disabled();
    assert_eq!(metrics.enabled_for_ms(), 0);
}

#[test]
fn test_snapshot_serializes() {
    let json = serde_json::to_value(empty_snapshot()).unwrap();
    assert_eq!(json["frames"], 0);
    assert!(json["timestamp"].is_string());
}
