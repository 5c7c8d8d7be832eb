//! Evaluator behavior through the public library surface.

use std::path::Path;

use backup_preflight::{evaluate, CapacityInfo, Thresholds};

#[test]
fn roomy_destination_gets_a_clean_verdict() {
    let verdict = evaluate(
        Path::new("/mnt/backup"),
        Some(CapacityInfo::new(
            1_000_000_000_000,
            500_000_000_000,
            500_000_000_000,
        )),
        10_000_000_000,
        &Thresholds::default(),
    );
    assert!(verdict.sufficient);
    assert!(verdict.warning.is_none());
    assert!(verdict.error.is_none());
    assert!(!verdict.blocks_copy());
}

#[test]
fn oversized_payload_yields_error_with_both_figures() {
    let verdict = evaluate(
        Path::new("/mnt/backup"),
        Some(CapacityInfo::new(
            1_000_000_000_000,
            500_000_000_000,
            500_000_000_000,
        )),
        990_000_000_000,
        &Thresholds::default(),
    );
    assert!(!verdict.sufficient);
    let error = verdict.error.expect("must error");
    assert!(error.contains("990.1 GB"), "{error}");
    assert!(error.contains("500.0 GB"), "{error}");
}

#[test]
fn tight_fit_warns_about_projected_free_percentage() {
    let verdict = evaluate(
        Path::new("/mnt/backup"),
        Some(CapacityInfo::new(
            100_000_000_000,
            15_000_000_000,
            15_000_000_000,
        )),
        6_000_000_000,
        &Thresholds::default(),
    );
    assert!(verdict.sufficient);
    assert!(verdict.error.is_none());
    assert!(verdict.warning.expect("must warn").contains("9.0%"));
}

#[test]
fn custom_thresholds_are_honored() {
    let thresholds = Thresholds {
        safety_buffer: 1_000,
        low_free_percent: 50.0,
    };
    let verdict = evaluate(
        Path::new("/mnt/backup"),
        Some(CapacityInfo::new(1_000_000, 600_000, 600_000)),
        200_000,
        &thresholds,
    );
    assert!(verdict.sufficient);
    // 40% projected free is below the raised 50% threshold
    assert!(verdict.low_free_after_copy);
    assert!(verdict.warning.is_some());
}
