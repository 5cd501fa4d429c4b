//! Batch run reports.
//! Every batch operation returns one `RunReport` listing each item it looked at,
//! successes and failures alike, plus every path change it produced.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::RebaseError;
use crate::material::PathChange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Material file rewritten on disk.
    Modified { changes: usize },
    /// Material file had nothing to rewrite.
    Unchanged,
    /// Directory renamed in one step.
    Renamed { to: PathBuf },
    /// Directory contents moved into an existing destination.
    Merged { into: PathBuf, source_removed: bool },
    /// Single file moved.
    Moved { to: PathBuf },
    /// Left alone on purpose (collision under `Skip`, vanished directory, ...).
    Skipped { reason: String },
    /// Dry run: what would have happened.
    Planned { action: String },
    /// Rewrite plan discarded before commit.
    Cancelled,
    Failed(RebaseError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Modified { changes } => write!(f, "modified ({changes} change(s))"),
            Outcome::Unchanged => f.write_str("unchanged"),
            Outcome::Renamed { to } => write!(f, "renamed -> {}", to.display()),
            Outcome::Merged { into, source_removed } => {
                write!(f, "merged -> {}", into.display())?;
                if !source_removed {
                    f.write_str(" (source kept: not empty)")?;
                }
                Ok(())
            }
            Outcome::Moved { to } => write!(f, "moved -> {}", to.display()),
            Outcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            Outcome::Planned { action } => write!(f, "dry-run: {action}"),
            Outcome::Cancelled => f.write_str("cancelled"),
            Outcome::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// A path change attributed to the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: PathBuf,
    pub change: PathChange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub entries: Vec<ReportEntry>,
    pub changes: Vec<ChangeRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, outcome: Outcome) {
        self.entries.push(ReportEntry {
            path: path.into(),
            outcome,
        });
    }

    pub fn record_changes(&mut self, path: &Path, changes: &[PathChange]) {
        self.changes.extend(changes.iter().map(|c| ChangeRecord {
            path: path.to_path_buf(),
            change: c.clone(),
        }));
    }

    /// Append everything from `other`.
    pub fn extend(&mut self, other: RunReport) {
        self.entries.extend(other.entries);
        self.changes.extend(other.changes);
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn summary(&self) -> Summary {
        let mut s = Summary::default();
        for e in &self.entries {
            match e.outcome {
                Outcome::Modified { .. } => s.modified += 1,
                Outcome::Unchanged => s.unchanged += 1,
                Outcome::Renamed { .. } => s.renamed += 1,
                Outcome::Merged { .. } => s.merged += 1,
                Outcome::Moved { .. } => s.moved += 1,
                Outcome::Skipped { .. } | Outcome::Cancelled => s.skipped += 1,
                Outcome::Planned { .. } => s.planned += 1,
                Outcome::Failed(_) => s.failed += 1,
            }
        }
        s.changes = self.changes.len();
        s
    }
}

/// Per-outcome counters for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub modified: usize,
    pub unchanged: usize,
    pub renamed: usize,
    pub merged: usize,
    pub moved: usize,
    pub skipped: usize,
    pub planned: usize,
    pub failed: usize,
    pub changes: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("modified", self.modified),
            ("unchanged", self.unchanged),
            ("renamed", self.renamed),
            ("merged", self.merged),
            ("moved", self.moved),
            ("skipped", self.skipped),
            ("planned", self.planned),
            ("failed", self.failed),
            ("path changes", self.changes),
        ];
        let shown: Vec<String> = parts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(label, n)| format!("{label}: {n}"))
            .collect();
        if shown.is_empty() {
            f.write_str("nothing to do")
        } else {
            f.write_str(&shown.join(", "))
        }
    }
}
