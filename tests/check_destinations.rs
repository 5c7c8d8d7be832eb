//! Multi-destination aggregation against real directories.

use std::path::PathBuf;

use assert_fs::prelude::*;
use backup_preflight::{check_destinations, Thresholds};

#[test]
fn all_roomy_destinations_proceed() {
    let temp = assert_fs::TempDir::new().unwrap();
    let a = temp.child("first");
    let b = temp.child("second");
    a.create_dir_all().unwrap();
    b.create_dir_all().unwrap();

    let dests = vec![a.path().to_path_buf(), b.path().to_path_buf()];
    let (decision, verdicts) = check_destinations(&dests, 1, &Thresholds::default(), false);

    assert!(decision.can_proceed);
    assert!(decision.errors.is_empty());
    assert_eq!(verdicts.len(), 2);
    for (dest, verdict) in dests.iter().zip(&verdicts) {
        assert_eq!(dest, &verdict.destination);
        assert!(verdict.capacity.total_bytes > 0);
    }
}

#[test]
fn one_unprobeable_destination_blocks_the_whole_backup() {
    let temp = assert_fs::TempDir::new().unwrap();
    let good1 = temp.child("good1");
    let good2 = temp.child("good2");
    good1.create_dir_all().unwrap();
    good2.create_dir_all().unwrap();
    let missing = temp.path().join("vanished");

    let dests = vec![
        good1.path().to_path_buf(),
        missing.clone(),
        good2.path().to_path_buf(),
    ];
    let (decision, verdicts) = check_destinations(&dests, 1, &Thresholds::default(), false);

    assert!(!decision.can_proceed);
    assert_eq!(decision.errors.len(), 1);
    assert!(
        decision.errors[0].starts_with("vanished: "),
        "error must name the failing destination: {}",
        decision.errors[0]
    );
    assert!(decision.errors[0].contains("unable to determine available disk space"));
    // ordering of verdicts matches the caller-supplied destination order
    let names: Vec<PathBuf> = verdicts.iter().map(|v| v.destination.clone()).collect();
    assert_eq!(names, dests);
}

#[test]
fn sequential_flag_produces_identical_results() {
    let temp = assert_fs::TempDir::new().unwrap();
    let a = temp.child("one");
    a.create_dir_all().unwrap();
    let dests = vec![a.path().to_path_buf(), temp.path().join("ghost")];

    let (par, _) = check_destinations(&dests, 1, &Thresholds::default(), false);
    let (seq, _) = check_destinations(&dests, 1, &Thresholds::default(), true);
    assert_eq!(par, seq);
}

#[test]
fn impossible_requirement_blocks_every_destination() {
    let temp = assert_fs::TempDir::new().unwrap();
    let a = temp.child("tiny");
    a.create_dir_all().unwrap();

    let dests = vec![a.path().to_path_buf()];
    // No volume has this much space.
    let (decision, verdicts) =
        check_destinations(&dests, u64::MAX / 2, &Thresholds::default(), true);

    assert!(!decision.can_proceed);
    assert_eq!(decision.errors.len(), 1);
    assert!(verdicts[0].blocks_copy());
    assert!(verdicts[0]
        .error
        .as_deref()
        .unwrap()
        .contains("insufficient space"));
}
