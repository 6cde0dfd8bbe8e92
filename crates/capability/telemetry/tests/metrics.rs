use tracker_telemetry::{
    TelemetryMetrics, metrics, record_objects_claimed, record_objects_purged,
    record_probe_failure,
};

#[test]
fn fresh_metrics_start_at_zero() {
    let metrics = TelemetryMetrics::new();
    assert_eq!(metrics.snapshot(), Default::default());
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_objects_claimed(3);
    record_probe_failure();
    record_objects_purged(2);
    let after = metrics().snapshot();

    assert!(after.objects_claimed >= before.objects_claimed + 3);
    assert!(after.probe_failures >= before.probe_failures + 1);
    assert!(after.objects_purged >= before.objects_purged + 2);
}
