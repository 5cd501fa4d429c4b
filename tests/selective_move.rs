use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;

use vmt_rebase::{CollisionPolicy, MoveOptions, Outcome, RebaseError, move_selected};

fn exts() -> Vec<String> {
    vec!["vmt".to_string(), "vtf".to_string()]
}

#[test]
fn only_matching_files_move() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("props/crate/crate.vmt").write_str("vmt").unwrap();
    root.child("props/crate/crate.VTF").write_str("vtf").unwrap();
    root.child("props/crate/crate.psd").write_str("psd").unwrap();
    root.child("props/crate/sub/deep.vtf").write_str("deep").unwrap();
    let src = root.path().join("props/crate");

    let report = move_selected(&[src.clone()], out.path(), "v2_", &exts(), &MoveOptions::default());

    let dest = out.path().join("v2_crate");
    assert_eq!(fs::read_to_string(dest.join("crate.vmt")).unwrap(), "vmt");
    assert_eq!(fs::read_to_string(dest.join("crate.VTF")).unwrap(), "vtf");
    assert!(!dest.join("crate.psd").exists());
    assert!(src.join("crate.psd").is_file());
    // Only direct children are considered.
    assert!(src.join("sub/deep.vtf").is_file());
    assert_eq!(
        report.outcome_for(&src.join("crate.vmt")),
        Some(&Outcome::Moved { to: dest.join("crate.vmt") })
    );
    assert_eq!(report.summary().moved, 2);
}

#[test]
fn vanished_directory_is_skipped() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let gone = root.path().join("gone");

    let report = move_selected(&[gone.clone()], out.path(), "v2_", &exts(), &MoveOptions::default());

    assert!(matches!(report.outcome_for(&gone), Some(Outcome::Skipped { .. })));
    assert!(!report.has_failures());
    assert!(!out.path().join("v2_gone").exists());
}

#[test]
fn empty_prefix_into_same_parent_is_skipped() {
    let root = TempDir::new().unwrap();
    root.child("crate/a.vtf").write_str("a").unwrap();
    let src = root.path().join("crate");

    let report = move_selected(&[src.clone()], root.path(), "", &exts(), &MoveOptions::default());

    assert!(matches!(report.outcome_for(&src), Some(Outcome::Skipped { .. })));
    assert!(src.join("a.vtf").is_file());
}

#[test]
fn collisions_follow_the_policy() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("crate/a.vtf").write_str("src").unwrap();
    out.child("v2_crate/a.vtf").write_str("dest").unwrap();
    let src = root.path().join("crate");
    let dest = out.path().join("v2_crate");

    let skip = move_selected(&[src.clone()], out.path(), "v2_", &exts(), &MoveOptions::default());
    assert!(matches!(skip.outcome_for(&src.join("a.vtf")), Some(Outcome::Skipped { .. })));
    assert_eq!(fs::read_to_string(dest.join("a.vtf")).unwrap(), "dest");

    let rename = MoveOptions {
        on_collision: CollisionPolicy::Rename,
        dry_run: false,
    };
    move_selected(&[src.clone()], out.path(), "v2_", &exts(), &rename);
    assert_eq!(fs::read_to_string(dest.join("a (2).vtf")).unwrap(), "src");
    assert!(!src.join("a.vtf").exists());
}

#[test]
fn fail_policy_checks_the_whole_directory_first() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("crate/a.vtf").write_str("a").unwrap();
    root.child("crate/b.vtf").write_str("b").unwrap();
    out.child("v2_crate/b.vtf").write_str("taken").unwrap();
    let src = root.path().join("crate");

    let report = move_selected(
        &[src.clone()],
        out.path(),
        "v2_",
        &exts(),
        &MoveOptions {
            on_collision: CollisionPolicy::Fail,
            dry_run: false,
        },
    );

    assert_eq!(
        report.outcome_for(&src),
        Some(&Outcome::Failed(RebaseError::Collision {
            path: out.path().join("v2_crate/b.vtf")
        }))
    );
    assert!(src.join("a.vtf").is_file());
    assert!(!out.path().join("v2_crate/a.vtf").exists());
}

#[test]
fn overwrite_replaces_existing_file() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("crate/a.vmt").write_str("new").unwrap();
    out.child("v2_crate/a.vmt").write_str("old").unwrap();
    let src = root.path().join("crate");

    let report = move_selected(
        &[src.clone()],
        out.path(),
        "v2_",
        &exts(),
        &MoveOptions {
            on_collision: CollisionPolicy::Overwrite,
            dry_run: false,
        },
    );

    assert!(!report.has_failures());
    assert_eq!(fs::read_to_string(out.path().join("v2_crate/a.vmt")).unwrap(), "new");
}

#[test]
fn dry_run_plans_without_creating_destination() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("crate/a.vmt").write_str("x").unwrap();
    let src = root.path().join("crate");

    let report = move_selected(
        &[src.clone()],
        out.path(),
        "v2_",
        &exts(),
        &MoveOptions {
            dry_run: true,
            ..MoveOptions::default()
        },
    );

    assert!(matches!(report.outcome_for(&src.join("a.vmt")), Some(Outcome::Planned { .. })));
    assert!(src.join("a.vmt").is_file());
    assert!(!out.path().join("v2_crate").exists());
}

#[test]
fn directory_without_matching_files_still_gets_destination() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("props/crate/readme.txt").write_str("notes").unwrap();
    let src = root.path().join("props/crate");

    let report = move_selected(&[src.clone()], out.path(), "v2_", &["vmt".to_string()], &MoveOptions::default());

    assert!(out.path().join("v2_crate").is_dir());
    assert_eq!(
        report.outcome_for(&src),
        Some(&Outcome::Skipped {
            reason: "no matching files".into()
        })
    );
    assert!(src.join("readme.txt").is_file());
    assert!(!report.has_failures());
}

#[test]
fn repeated_directories_are_moved_once() {
    let root = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    root.child("crate/a.vtf").write_str("a").unwrap();
    let src = root.path().join("crate");

    let report = move_selected(
        &[src.clone(), src.clone()],
        out.path(),
        "v2_",
        &exts(),
        &MoveOptions {
            on_collision: CollisionPolicy::Rename,
            dry_run: false,
        },
    );

    assert_eq!(report.summary().moved, 1);
    // A second pass over the same directory would add a "no matching files" entry.
    assert_eq!(report.entries.len(), 1, "entries: {:?}", report.entries);
    assert_eq!(fs::read_to_string(out.path().join("v2_crate/a.vtf")).unwrap(), "a");
    assert!(!out.path().join("v2_crate/a (2).vtf").exists());
    assert!(!report.has_failures());
}
