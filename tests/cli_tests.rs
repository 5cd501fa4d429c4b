use clap::Parser;
use std::path::PathBuf;

use vmt_rebase::cli::{Args, Command};
use vmt_rebase::config::types::{Config, LogLevel};
use vmt_rebase::fs_ops::CollisionPolicy;

#[test]
fn rewrite_subcommand_parses() {
    let args = Args::parse_from(["vmt_rebase", "rewrite", "/m", "--new-base", "models/new"]);
    assert_eq!(
        args.command,
        Command::Rewrite {
            root: Some(PathBuf::from("/m")),
            new_base: Some("models/new".into()),
        }
    );
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let args = Args::parse_from([
        "vmt_rebase",
        "rename",
        "/m",
        "--prefix",
        "v2_",
        "--dry-run",
        "--on-collision",
        "rename",
    ]);
    assert!(args.dry_run);
    assert_eq!(args.on_collision, Some(CollisionPolicy::Rename));
}

#[test]
fn bad_collision_policy_is_a_parse_error() {
    let res = Args::try_parse_from(["vmt_rebase", "scan", "/m", "--on-collision", "clobber"]);
    assert!(res.is_err());
}

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["vmt_rebase", "--debug", "--log-level", "quiet", "scan"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args = Args::parse_from(["vmt_rebase", "--log-level", "info", "scan"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));

    let args = Args::parse_from(["vmt_rebase", "scan"]);
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn apply_overrides_for_move() {
    let args = Args::parse_from([
        "vmt_rebase",
        "move",
        "/m",
        "--dest",
        "/out",
        "--prefix",
        "hd_",
        "--ext",
        "VTF, .vmt",
        "--dirs-file",
        "/tmp/dirs.txt",
        "--tracked-ext",
        ".VMT",
    ]);
    let mut cfg = Config {
        prefix_suffix: Some("from_config_".into()),
        ..Config::default()
    };
    args.apply_overrides(&mut cfg).unwrap();

    assert_eq!(cfg.materials_dir, Some(PathBuf::from("/m")));
    assert_eq!(cfg.destination_root, Some(PathBuf::from("/out")));
    assert_eq!(cfg.prefix_suffix.as_deref(), Some("hd_"));
    assert_eq!(cfg.move_extensions, vec!["vtf", "vmt"]);
    assert_eq!(cfg.tracked_extension, "vmt");
    assert_eq!(args.command.dirs_file(), Some(&PathBuf::from("/tmp/dirs.txt")));
}

#[test]
fn unset_flags_keep_config_values() {
    let args = Args::parse_from(["vmt_rebase", "rewrite"]);
    let mut cfg = Config {
        materials_dir: Some("/from/config".into()),
        new_base_path: Some("models/cfg".into()),
        on_collision: CollisionPolicy::Fail,
        log_level: LogLevel::Quiet,
        ..Config::default()
    };
    let before = cfg.clone();
    args.apply_overrides(&mut cfg).unwrap();
    assert_eq!(cfg, before);
}
