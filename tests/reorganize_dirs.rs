use assert_fs::TempDir;
use assert_fs::prelude::*;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;

use vmt_rebase::{CollisionPolicy, MoveOptions, Outcome, RebaseError, reorganize_dirs, shutdown};

fn opts(on_collision: CollisionPolicy) -> MoveOptions {
    MoveOptions {
        on_collision,
        dry_run: false,
    }
}

#[test]
#[serial]
fn missing_destination_renames_whole_directory() {
    let root = TempDir::new().unwrap();
    root.child("materials/props/crate/crate.vmt").write_str("x").unwrap();
    root.child("materials/props/crate/crate.vtf").write_str("t").unwrap();
    let src = root.path().join("materials/props/crate");
    let dest = root.path().join("materials/props/v2_crate");

    let report = reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());

    assert_eq!(report.outcome_for(&src), Some(&Outcome::Renamed { to: dest.clone() }));
    assert!(!src.exists());
    assert!(dest.join("crate.vmt").is_file());
    assert!(dest.join("crate.vtf").is_file());
}

#[test]
#[serial]
fn existing_destination_is_merged_and_source_removed() {
    let root = TempDir::new().unwrap();
    root.child("props/v2_crate/a.vtf").write_str("a").unwrap();
    root.child("props/crate/b.vtf").write_str("b").unwrap();
    let src = root.path().join("props/crate");
    let dest = root.path().join("props/v2_crate");

    let report = reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());

    assert_eq!(
        report.outcome_for(&src),
        Some(&Outcome::Merged {
            into: dest.clone(),
            source_removed: true
        })
    );
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(dest.join("a.vtf")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dest.join("b.vtf")).unwrap(), "b");
    assert!(!report.has_failures());
}

#[test]
#[serial]
fn merge_recurses_into_same_named_subdirectories() {
    let root = TempDir::new().unwrap();
    root.child("m/v2_rock/detail/old.vtf").write_str("old").unwrap();
    root.child("m/rock/detail/new.vtf").write_str("new").unwrap();
    root.child("m/rock/rock.vmt").write_str("vmt").unwrap();
    let src = root.path().join("m/rock");
    let dest = root.path().join("m/v2_rock");

    reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());

    assert!(!src.exists());
    assert!(dest.join("detail/old.vtf").is_file());
    assert!(dest.join("detail/new.vtf").is_file());
    assert!(dest.join("rock.vmt").is_file());
}

#[test]
#[serial]
fn skip_leaves_colliding_file_and_keeps_source() {
    let root = TempDir::new().unwrap();
    root.child("p/v2_crate/a.vtf").write_str("dest").unwrap();
    root.child("p/crate/a.vtf").write_str("src").unwrap();
    root.child("p/crate/b.vtf").write_str("b").unwrap();
    let src = root.path().join("p/crate");
    let dest = root.path().join("p/v2_crate");

    let report = reorganize_dirs(&[src.clone()], "v2_", &opts(CollisionPolicy::Skip));

    assert_eq!(fs::read_to_string(dest.join("a.vtf")).unwrap(), "dest");
    assert_eq!(fs::read_to_string(src.join("a.vtf")).unwrap(), "src");
    assert!(dest.join("b.vtf").is_file());
    assert!(matches!(
        report.outcome_for(&src.join("a.vtf")),
        Some(Outcome::Skipped { .. })
    ));
    // The leftover keeps the source directory alive; that is not a failure.
    assert_eq!(
        report.outcome_for(&src),
        Some(&Outcome::Merged {
            into: dest,
            source_removed: false
        })
    );
    assert!(!report.has_failures());
}

#[test]
#[serial]
fn overwrite_replaces_destination_file() {
    let root = TempDir::new().unwrap();
    root.child("p/v2_crate/a.vtf").write_str("dest").unwrap();
    root.child("p/crate/a.vtf").write_str("src").unwrap();
    let src = root.path().join("p/crate");
    let dest = root.path().join("p/v2_crate");

    let report = reorganize_dirs(&[src.clone()], "v2_", &opts(CollisionPolicy::Overwrite));

    assert_eq!(fs::read_to_string(dest.join("a.vtf")).unwrap(), "src");
    assert!(!src.exists());
    assert_eq!(
        report.outcome_for(&src.join("a.vtf")),
        Some(&Outcome::Moved { to: dest.join("a.vtf") })
    );
}

#[test]
#[serial]
fn overwrite_never_replaces_a_directory_with_a_file() {
    let root = TempDir::new().unwrap();
    root.child("p/v2_crate/a.vtf/inner.txt").write_str("keep").unwrap();
    root.child("p/crate/a.vtf").write_str("src").unwrap();
    let src = root.path().join("p/crate");
    let dest = root.path().join("p/v2_crate");

    let report = reorganize_dirs(&[src.clone()], "v2_", &opts(CollisionPolicy::Overwrite));

    assert!(dest.join("a.vtf/inner.txt").is_file());
    assert_eq!(
        report.outcome_for(&src.join("a.vtf")),
        Some(&Outcome::Failed(RebaseError::Collision {
            path: dest.join("a.vtf")
        }))
    );
}

#[test]
#[serial]
fn rename_policy_appends_counter() {
    let root = TempDir::new().unwrap();
    root.child("p/v2_crate/a.vtf").write_str("dest").unwrap();
    root.child("p/crate/a.vtf").write_str("src").unwrap();
    let src = root.path().join("p/crate");
    let dest = root.path().join("p/v2_crate");

    reorganize_dirs(&[src.clone()], "v2_", &opts(CollisionPolicy::Rename));

    assert_eq!(fs::read_to_string(dest.join("a.vtf")).unwrap(), "dest");
    assert_eq!(fs::read_to_string(dest.join("a (2).vtf")).unwrap(), "src");
    assert!(!src.exists());
}

#[test]
#[serial]
fn fail_policy_moves_nothing_from_that_directory() {
    let root = TempDir::new().unwrap();
    root.child("p/v2_crate/sub/a.vtf").write_str("dest").unwrap();
    root.child("p/crate/sub/a.vtf").write_str("src").unwrap();
    root.child("p/crate/b.vtf").write_str("b").unwrap();
    root.child("p/barrel/barrel.vmt").write_str("x").unwrap();
    let src = root.path().join("p/crate");
    let other = root.path().join("p/barrel");

    let report = reorganize_dirs(&[src.clone(), other.clone()], "v2_", &opts(CollisionPolicy::Fail));

    assert_eq!(
        report.outcome_for(&src),
        Some(&Outcome::Failed(RebaseError::Collision {
            path: root.path().join("p/v2_crate/sub/a.vtf")
        }))
    );
    assert!(src.join("b.vtf").is_file());
    assert!(!root.path().join("p/v2_crate/b.vtf").exists());
    // Other directories still run.
    assert!(root.path().join("p/v2_barrel/barrel.vmt").is_file());
    assert!(report.has_failures());
}

#[test]
#[serial]
fn nested_discovered_directories_are_processed_deepest_first() {
    let root = TempDir::new().unwrap();
    root.child("m/props/a.vmt").write_str("x").unwrap();
    root.child("m/props/crate/b.vmt").write_str("y").unwrap();
    let parent = root.path().join("m/props");
    let child = root.path().join("m/props/crate");

    let report = reorganize_dirs(&[parent.clone(), child.clone()], "v2_", &MoveOptions::default());

    assert!(!report.has_failures(), "{:?}", report.entries);
    assert!(root.path().join("m/v2_props/a.vmt").is_file());
    assert!(root.path().join("m/v2_props/v2_crate/b.vmt").is_file());
    assert_eq!(report.entries[0].path, child);
}

#[test]
#[serial]
fn vanished_directory_fails_alone() {
    let root = TempDir::new().unwrap();
    root.child("p/ok/a.vmt").write_str("x").unwrap();
    let gone: PathBuf = root.path().join("p/gone");
    let ok = root.path().join("p/ok");

    let report = reorganize_dirs(&[gone.clone(), ok.clone()], "v2_", &MoveOptions::default());

    match report.outcome_for(&gone) {
        Some(Outcome::Failed(e)) => assert_eq!(e.kind(), "rename_error"),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(matches!(report.outcome_for(&ok), Some(Outcome::Renamed { .. })));
}

#[test]
#[serial]
fn file_in_the_way_of_destination_is_a_collision() {
    let root = TempDir::new().unwrap();
    root.child("p/crate/a.vmt").write_str("x").unwrap();
    root.child("p/v2_crate").write_str("not a dir").unwrap();
    let src = root.path().join("p/crate");

    let report = reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());

    assert!(matches!(
        report.outcome_for(&src),
        Some(Outcome::Failed(RebaseError::Collision { .. }))
    ));
    assert!(src.join("a.vmt").is_file());
}

#[test]
#[serial]
fn dry_run_touches_nothing() {
    let root = TempDir::new().unwrap();
    root.child("p/crate/a.vmt").write_str("x").unwrap();
    root.child("p/v2_barrel/a.vtf").write_str("x").unwrap();
    root.child("p/barrel/b.vtf").write_str("y").unwrap();
    let crate_dir = root.path().join("p/crate");
    let barrel = root.path().join("p/barrel");

    let report = reorganize_dirs(
        &[crate_dir.clone(), barrel.clone()],
        "v2_",
        &MoveOptions {
            dry_run: true,
            ..MoveOptions::default()
        },
    );

    assert!(matches!(report.outcome_for(&crate_dir), Some(Outcome::Planned { .. })));
    assert!(matches!(report.outcome_for(&barrel), Some(Outcome::Planned { .. })));
    assert!(crate_dir.join("a.vmt").is_file());
    assert!(barrel.join("b.vtf").is_file());
    assert!(!root.path().join("p/v2_crate").exists());
}

#[test]
#[serial]
fn shutdown_request_interrupts_remaining_directories() {
    let root = TempDir::new().unwrap();
    root.child("p/crate/a.vmt").write_str("x").unwrap();
    let src = root.path().join("p/crate");

    shutdown::request();
    let report = reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());
    shutdown::reset();

    assert_eq!(report.outcome_for(&src), Some(&Outcome::Failed(RebaseError::Interrupted)));
    assert!(src.join("a.vmt").is_file());
}
