//! Directory reorganizer.
//!
//! Each discovered directory `parent/name` goes to `parent/<prefix>name`:
//! - destination missing: one rename of the whole directory;
//! - destination present: merge children into it, then remove the source if
//!   it ended up empty (a non-empty leftover is tolerated and reported).
//!
//! Directories are processed deepest first so renaming a parent never strands
//! a discovered child.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::RebaseError;
use crate::report::{Outcome, RunReport};
use crate::shutdown;

use super::atomic::move_file;
use super::duplicate::{CollisionPolicy, exists_no_follow, unique_name_in};
use super::helpers::explain_io_error;

/// Options shared by the reorganizer and the selective mover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOptions {
    pub on_collision: CollisionPolicy,
    pub dry_run: bool,
}

/// Where one directory goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source_dir: PathBuf,
    pub destination_base_name: OsString,
    pub prefix_suffix: String,
}

impl RenamePlan {
    /// `None` when `source_dir` has no final component (e.g. `/` or `..`).
    pub fn new(source_dir: &Path, prefix_suffix: &str) -> Option<Self> {
        let name = source_dir.file_name()?;
        Some(Self {
            source_dir: source_dir.to_path_buf(),
            destination_base_name: name.to_os_string(),
            prefix_suffix: prefix_suffix.to_string(),
        })
    }

    /// `<prefix><base name>`
    pub fn destination_name(&self) -> OsString {
        let mut name = OsString::from(&self.prefix_suffix);
        name.push(&self.destination_base_name);
        name
    }

    /// Sibling of the source directory.
    pub fn destination(&self) -> PathBuf {
        self.source_dir.with_file_name(self.destination_name())
    }
}

/// Rename or merge every directory in `dirs` to its prefixed sibling.
pub fn reorganize_dirs(dirs: &[PathBuf], prefix_suffix: &str, opts: &MoveOptions) -> RunReport {
    let mut report = RunReport::new();

    let mut ordered: Vec<&PathBuf> = dirs.iter().collect();
    ordered.sort_by(|a, b| {
        b.components()
            .count()
            .cmp(&a.components().count())
            .then_with(|| a.cmp(b))
    });
    ordered.dedup();

    for (idx, dir) in ordered.iter().enumerate() {
        if shutdown::is_requested() {
            for rest in &ordered[idx..] {
                report.push(rest.as_path(), Outcome::Failed(RebaseError::Interrupted));
            }
            warn!(remaining = ordered.len() - idx, "Reorganize interrupted");
            break;
        }
        let outcome = reorganize_one(dir, prefix_suffix, opts, &mut report);
        match &outcome {
            Outcome::Failed(e) => {
                warn!(code = e.code(), kind = e.kind(), dir = %dir.display(), error = %e, "Directory not reorganized")
            }
            other => debug!(dir = %dir.display(), outcome = %other, "Directory processed"),
        }
        report.push(dir.as_path(), outcome);
    }
    report
}

fn reorganize_one(dir: &Path, prefix_suffix: &str, opts: &MoveOptions, report: &mut RunReport) -> Outcome {
    let Some(plan) = RenamePlan::new(dir, prefix_suffix) else {
        return Outcome::Failed(RebaseError::Rename {
            from: dir.to_path_buf(),
            to: dir.to_path_buf(),
            cause: "path has no directory name".into(),
        });
    };
    let dest = plan.destination();

    if dest == dir {
        return Outcome::Skipped {
            reason: "destination equals source (empty prefix)".into(),
        };
    }

    match fs::symlink_metadata(dir) {
        Ok(m) if m.is_dir() => {}
        Ok(_) => {
            return Outcome::Failed(RebaseError::Rename {
                from: dir.to_path_buf(),
                to: dest,
                cause: "source is no longer a directory".into(),
            });
        }
        Err(e) => {
            return Outcome::Failed(RebaseError::Rename {
                from: dir.to_path_buf(),
                to: dest,
                cause: explain_io_error("stat source directory", dir, &e),
            });
        }
    }

    let dest_meta = match fs::symlink_metadata(&dest) {
        Ok(m) => Some(m),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            return Outcome::Failed(RebaseError::Rename {
                from: dir.to_path_buf(),
                to: dest.clone(),
                cause: explain_io_error("stat destination", &dest, &e),
            });
        }
    };

    match dest_meta {
        None => rename_whole(dir, &dest, opts),
        Some(m) if m.is_dir() => merge_dir(dir, &dest, opts, report),
        Some(_) => Outcome::Failed(RebaseError::Collision { path: dest }),
    }
}

fn rename_whole(dir: &Path, dest: &Path, opts: &MoveOptions) -> Outcome {
    if opts.dry_run {
        info!(src = %dir.display(), dest = %dest.display(), "dry-run: would rename directory");
        return Outcome::Planned {
            action: format!("rename to {}", dest.display()),
        };
    }
    match fs::rename(dir, dest) {
        Ok(()) => {
            info!(src = %dir.display(), dest = %dest.display(), "Renamed directory");
            Outcome::Renamed {
                to: dest.to_path_buf(),
            }
        }
        Err(e) => Outcome::Failed(RebaseError::Rename {
            from: dir.to_path_buf(),
            to: dest.to_path_buf(),
            cause: explain_io_error("rename directory", dir, &e),
        }),
    }
}

fn merge_dir(dir: &Path, dest: &Path, opts: &MoveOptions, report: &mut RunReport) -> Outcome {
    if opts.on_collision == CollisionPolicy::Fail {
        match first_collision(dir, dest) {
            Ok(Some(path)) => return Outcome::Failed(RebaseError::Collision { path }),
            Ok(None) => {}
            Err(e) => {
                return Outcome::Failed(RebaseError::Rename {
                    from: dir.to_path_buf(),
                    to: dest.to_path_buf(),
                    cause: explain_io_error("inspect directory", dir, &e),
                });
            }
        }
    }

    if opts.dry_run {
        info!(src = %dir.display(), dest = %dest.display(), "dry-run: would merge directory");
        return Outcome::Planned {
            action: format!("merge into {}", dest.display()),
        };
    }

    if let Err(e) = merge_children(dir, dest, opts.on_collision, report) {
        return Outcome::Failed(RebaseError::Rename {
            from: dir.to_path_buf(),
            to: dest.to_path_buf(),
            cause: explain_io_error("list directory", dir, &e),
        });
    }

    let source_removed = match fs::remove_dir(dir) {
        Ok(()) => true,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Source directory kept after merge (not empty)");
            false
        }
    };
    info!(src = %dir.display(), dest = %dest.display(), source_removed, "Merged directory");
    Outcome::Merged {
        into: dest.to_path_buf(),
        source_removed,
    }
}

/// Move every child of `src` into `dest`, recursing into same-named
/// subdirectories. Per-entry problems go into `report`; only a failure to
/// list `src` itself is returned.
fn merge_children(src: &Path, dest: &Path, policy: CollisionPolicy, report: &mut RunReport) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %src.display(), error = %e, "Skipping unreadable entry during merge");
                continue;
            }
        };
        let from = entry.path();
        let name = entry.file_name();
        let to = dest.join(&name);
        let from_is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        let existing = match fs::symlink_metadata(&to) {
            Ok(m) => Some(m.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                report.push(&from, failed_move(&from, &to, "stat destination", &e));
                continue;
            }
        };

        let target = match existing {
            None => to,
            Some(true) if from_is_dir => {
                if let Err(e) = merge_children(&from, &to, policy, report) {
                    report.push(&from, failed_move(&from, &to, "list directory", &e));
                    continue;
                }
                if fs::remove_dir(&from).is_err() {
                    debug!(dir = %from.display(), "Nested source directory kept after merge");
                }
                continue;
            }
            Some(dest_is_dir) => match policy {
                CollisionPolicy::Skip | CollisionPolicy::Fail => {
                    // Fail was checked up front; reaching here means the destination
                    // appeared mid-merge, which is handled like Skip.
                    report.push(
                        &from,
                        Outcome::Skipped {
                            reason: format!("{} already exists", to.display()),
                        },
                    );
                    continue;
                }
                CollisionPolicy::Overwrite if dest_is_dir || from_is_dir => {
                    report.push(&from, Outcome::Failed(RebaseError::Collision { path: to }));
                    continue;
                }
                CollisionPolicy::Overwrite => to,
                CollisionPolicy::Rename => unique_name_in(dest, &name),
            },
        };

        let moved = if from_is_dir {
            fs::rename(&from, &target)
        } else {
            move_file(&from, &target)
        };
        match moved {
            Ok(()) => {
                debug!(src = %from.display(), dest = %target.display(), "moved entry");
                if target != dest.join(&name) || existing.is_some() {
                    report.push(&from, Outcome::Moved { to: target });
                }
            }
            Err(e) => report.push(&from, failed_move(&from, &target, "move entry", &e)),
        }
    }
    Ok(())
}

fn failed_move(from: &Path, to: &Path, op: &str, e: &io::Error) -> Outcome {
    Outcome::Failed(RebaseError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        cause: explain_io_error(op, from, e),
    })
}

/// First destination path a merge of `src` into `dest` would collide on.
fn first_collision(src: &Path, dest: &Path) -> io::Result<Option<PathBuf>> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let to = dest.join(entry.file_name());
        if !exists_no_follow(&to) {
            continue;
        }
        let both_dirs = entry.file_type()?.is_dir() && fs::symlink_metadata(&to)?.is_dir();
        if !both_dirs {
            return Ok(Some(to));
        }
        if let Some(hit) = first_collision(&entry.path(), &to)? {
            return Ok(Some(hit));
        }
    }
    Ok(None)
}
