//! Two-phase rewrite: compute every change first, then commit or cancel.
//!
//! `plan_rewrites` only reads from disk. Loading and rewriting run on the
//! rayon pool; files are independent so the order of work is not observable.
//! `RewritePlan::commit` writes candidates one at a time, checking for a
//! shutdown request between files.

use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_TRACKED_EXTENSION, normalize_new_base};
use crate::errors::RebaseError;
use crate::fs_ops::find_tracked_files;
use crate::material::{self, RewriteResult, WriteOutcome};
use crate::report::{Outcome, RunReport};
use crate::shutdown;

#[derive(Debug)]
enum PlanItem {
    Candidate(RewriteResult),
    Unchanged(PathBuf),
    Unreadable(PathBuf, RebaseError),
}

/// Rewrites computed for one tree, not yet written.
#[derive(Debug)]
pub struct RewritePlan {
    root: PathBuf,
    new_base: String,
    items: Vec<PlanItem>,
}

/// Load and rewrite every tracked file under `root` in memory.
///
/// Fails only when `root` is not a readable directory or `new_base` is
/// unusable; per-file read problems end up in the plan.
pub fn plan_rewrites(root: &Path, new_base: &str, tracked_ext: &str) -> Result<RewritePlan> {
    let new_base = normalize_new_base(new_base)?;
    let files = find_tracked_files(root, tracked_ext)?;

    let items: Vec<PlanItem> = files
        .into_par_iter()
        .map(|path| match material::load(&path) {
            Ok(source) => {
                let result = RewriteResult::new(source, &new_base);
                if result.is_candidate() {
                    PlanItem::Candidate(result)
                } else {
                    PlanItem::Unchanged(path)
                }
            }
            Err(e) => {
                warn!(code = e.code(), kind = e.kind(), path = %path.display(), error = %e, "Material file unreadable");
                PlanItem::Unreadable(path, e)
            }
        })
        .collect();

    let plan = RewritePlan {
        root: root.to_path_buf(),
        new_base,
        items,
    };
    info!(
        root = %plan.root.display(),
        new_base = %plan.new_base,
        files = plan.items.len(),
        candidates = plan.candidates().count(),
        changes = plan.change_count(),
        "Rewrite planned"
    );
    Ok(plan)
}

impl RewritePlan {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base path after normalization (forward slashes, no trailing slash).
    pub fn new_base(&self) -> &str {
        &self.new_base
    }

    /// Files that would be written.
    pub fn candidates(&self) -> impl Iterator<Item = &RewriteResult> {
        self.items.iter().filter_map(|i| match i {
            PlanItem::Candidate(r) => Some(r),
            _ => None,
        })
    }

    pub fn change_count(&self) -> usize {
        self.candidates().map(|r| r.changes().len()).sum()
    }

    pub fn file_count(&self) -> usize {
        self.items.len()
    }

    /// What `commit` would do, without doing it.
    pub fn preview(&self) -> RunReport {
        let mut report = RunReport::new();
        for item in &self.items {
            match item {
                PlanItem::Candidate(r) => {
                    let path = r.source().path();
                    report.record_changes(path, r.changes());
                    report.push(path, planned(r));
                }
                PlanItem::Unchanged(path) => report.push(path, Outcome::Unchanged),
                PlanItem::Unreadable(path, e) => report.push(path, Outcome::Failed(e.clone())),
            }
        }
        report
    }

    /// Write every candidate. With `dry_run` nothing is written and each
    /// candidate is reported as planned.
    pub fn commit(self, dry_run: bool) -> RunReport {
        let mut report = RunReport::new();
        let mut interrupted = false;

        for item in self.items {
            let result = match item {
                PlanItem::Unchanged(path) => {
                    report.push(path, Outcome::Unchanged);
                    continue;
                }
                PlanItem::Unreadable(path, e) => {
                    report.push(path, Outcome::Failed(e));
                    continue;
                }
                PlanItem::Candidate(r) => r,
            };

            let path = result.source().path().to_path_buf();
            if !interrupted && shutdown::is_requested() {
                warn!("Rewrite interrupted; remaining files left untouched");
                interrupted = true;
            }
            if interrupted {
                report.push(path, Outcome::Failed(RebaseError::Interrupted));
                continue;
            }
            if dry_run {
                report.record_changes(&path, result.changes());
                report.push(path, planned(&result));
                continue;
            }

            let changes = result.changes().to_vec();
            match material::apply(result) {
                Ok(WriteOutcome::Written { path, changes: n }) => {
                    report.record_changes(&path, &changes);
                    report.push(path, Outcome::Modified { changes: n });
                }
                Ok(WriteOutcome::NotACandidate { path }) => report.push(path, Outcome::Unchanged),
                Err(e) => {
                    warn!(code = e.code(), kind = e.kind(), path = %path.display(), error = %e, "Material file not written");
                    report.push(path, Outcome::Failed(e));
                }
            }
        }
        debug!(summary = %report.summary(), "Rewrite committed");
        report
    }

    /// Drop the plan. Candidates are reported as cancelled; nothing is written.
    pub fn cancel(self) -> RunReport {
        let mut report = RunReport::new();
        for item in self.items {
            match item {
                PlanItem::Candidate(r) => report.push(r.source().path(), Outcome::Cancelled),
                PlanItem::Unchanged(path) => report.push(path, Outcome::Unchanged),
                PlanItem::Unreadable(path, e) => report.push(path, Outcome::Failed(e)),
            }
        }
        info!(root = %self.root.display(), "Rewrite plan cancelled");
        report
    }
}

fn planned(r: &RewriteResult) -> Outcome {
    Outcome::Planned {
        action: format!("rewrite {} path(s)", r.changes().len()),
    }
}

/// Plan and commit in one step for every `.vmt` under `root`.
pub fn rewrite_paths(root: &Path, new_base: &str) -> Result<RunReport> {
    Ok(plan_rewrites(root, new_base, DEFAULT_TRACKED_EXTENSION)?.commit(false))
}
