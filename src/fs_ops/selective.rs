//! Selective mover: relocate only files with chosen extensions from each
//! discovered directory into `<destination_root>/<prefix><dir name>`.
//! Everything else stays where it is.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::RebaseError;
use crate::report::{Outcome, RunReport};
use crate::shutdown;

use super::atomic::move_file;
use super::duplicate::{CollisionPolicy, exists_no_follow, unique_name_in};
use super::helpers::explain_io_error;
use super::reorganize::{MoveOptions, RenamePlan};
use super::scan::{has_extension, normalize_extension};

/// Move matching files out of every directory in `dirs`.
/// One report entry per directory that was skipped or could not be processed,
/// and per file looked at. Repeated entries in `dirs` are handled once.
pub fn move_selected(
    dirs: &[PathBuf],
    destination_root: &Path,
    prefix_suffix: &str,
    extensions: &[String],
    opts: &MoveOptions,
) -> RunReport {
    let exts: Vec<String> = extensions.iter().map(|e| normalize_extension(e)).collect();
    let mut report = RunReport::new();

    let mut ordered: Vec<&PathBuf> = dirs.iter().collect();
    ordered.sort();
    ordered.dedup();

    for (idx, dir) in ordered.iter().enumerate() {
        if shutdown::is_requested() {
            for rest in &ordered[idx..] {
                report.push(rest.as_path(), Outcome::Failed(RebaseError::Interrupted));
            }
            warn!(remaining = ordered.len() - idx, "Selective move interrupted");
            break;
        }
        move_from_dir(dir, destination_root, prefix_suffix, &exts, opts, &mut report);
    }
    report
}

fn move_from_dir(
    dir: &Path,
    destination_root: &Path,
    prefix_suffix: &str,
    exts: &[String],
    opts: &MoveOptions,
    report: &mut RunReport,
) {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "directory no longer exists; skipping");
        report.push(
            dir,
            Outcome::Skipped {
                reason: "directory no longer exists".into(),
            },
        );
        return;
    }
    let Some(plan) = RenamePlan::new(dir, prefix_suffix) else {
        report.push(
            dir,
            Outcome::Skipped {
                reason: "path has no directory name".into(),
            },
        );
        return;
    };
    let dest_dir = destination_root.join(plan.destination_name());

    if same_dir(dir, &dest_dir) {
        report.push(
            dir,
            Outcome::Skipped {
                reason: "destination equals source".into(),
            },
        );
        return;
    }

    let files = match matching_files(dir, exts) {
        Ok(f) => f,
        Err(e) => {
            report.push(
                dir,
                Outcome::Failed(RebaseError::Read {
                    path: dir.to_path_buf(),
                    cause: explain_io_error("list directory", dir, &e),
                }),
            );
            return;
        }
    };

    if opts.on_collision == CollisionPolicy::Fail
        && let Some(path) = files
            .iter()
            .filter_map(|f| f.file_name())
            .map(|name| dest_dir.join(name))
            .find(|to| exists_no_follow(to))
    {
        report.push(dir, Outcome::Failed(RebaseError::Collision { path }));
        return;
    }

    if opts.dry_run {
        if files.is_empty() {
            report.push(dir, no_matching_files());
        }
        for src in files {
            let to = dest_dir.join(src.file_name().unwrap_or_default());
            info!(src = %src.display(), dest = %to.display(), "dry-run: would move file");
            report.push(
                src,
                Outcome::Planned {
                    action: format!("move to {}", to.display()),
                },
            );
        }
        return;
    }

    if let Err(e) = fs::create_dir_all(&dest_dir) {
        report.push(
            dir,
            Outcome::Failed(RebaseError::Write {
                path: dest_dir.clone(),
                cause: explain_io_error("create destination directory", &dest_dir, &e),
            }),
        );
        return;
    }

    if files.is_empty() {
        debug!(dir = %dir.display(), dest = %dest_dir.display(), "no matching files");
        report.push(dir, no_matching_files());
        return;
    }

    for src in files {
        let outcome = move_one(&src, &dest_dir, opts.on_collision);
        if let Outcome::Failed(e) = &outcome {
            warn!(code = e.code(), kind = e.kind(), src = %src.display(), error = %e, "File not moved");
        }
        report.push(src, outcome);
    }
}

fn no_matching_files() -> Outcome {
    Outcome::Skipped {
        reason: "no matching files".into(),
    }
}

fn move_one(src: &Path, dest_dir: &Path, policy: CollisionPolicy) -> Outcome {
    let Some(name) = src.file_name() else {
        return Outcome::Skipped {
            reason: "path has no file name".into(),
        };
    };
    let mut to = dest_dir.join(name);

    if exists_no_follow(&to) {
        match policy {
            CollisionPolicy::Skip => {
                return Outcome::Skipped {
                    reason: format!("{} already exists", to.display()),
                };
            }
            // Fail is checked per directory before anything moves; a file that
            // appears afterwards is a collision for that entry alone.
            CollisionPolicy::Fail => return Outcome::Failed(RebaseError::Collision { path: to }),
            CollisionPolicy::Overwrite if to.is_dir() => {
                return Outcome::Failed(RebaseError::Collision { path: to });
            }
            CollisionPolicy::Overwrite => {}
            CollisionPolicy::Rename => to = unique_name_in(dest_dir, name),
        }
    }

    match move_file(src, &to) {
        Ok(()) => {
            info!(src = %src.display(), dest = %to.display(), "Moved file");
            Outcome::Moved { to }
        }
        Err(e) => Outcome::Failed(RebaseError::Rename {
            from: src.to_path_buf(),
            to,
            cause: explain_io_error("move file", src, &e),
        }),
    }
}

/// Regular files directly inside `dir` with a wanted extension, sorted.
fn matching_files(dir: &Path, exts: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && has_extension(&entry.path(), exts) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
