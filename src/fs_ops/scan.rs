//! Tree walk: find tracked material files and the directories holding them.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A directory known to contain at least one tracked file at scan time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredDirectory {
    pub path: PathBuf,
    pub tracked_files: usize,
}

/// Lowercase an extension and drop a leading dot: ".VMT" -> "vmt".
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// True if `path` has one of `extensions` (already normalized), ignoring case.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            extensions.iter().any(|x| *x == e)
        })
        .unwrap_or(false)
}

fn ensure_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root)
        .with_context(|| format!("Materials directory '{}' is not accessible", root.display()))?;
    if !meta.is_dir() {
        bail!("Materials directory '{}' is not a directory", root.display());
    }
    Ok(())
}

/// Every file under `root` whose extension is `tracked_ext`, sorted by path.
/// Unreadable subtrees are logged and skipped.
pub fn find_tracked_files(root: &Path, tracked_ext: &str) -> Result<Vec<PathBuf>> {
    ensure_root(root)?;
    let wanted = [normalize_extension(tracked_ext)];

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry during scan");
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), &wanted) {
            files.push(entry.into_path());
        }
    }
    debug!(root = %root.display(), count = files.len(), "tracked files found");
    Ok(files)
}

/// Directories under `root` (including `root`) that hold tracked files,
/// deduplicated and sorted by path.
pub fn scan(root: &Path, tracked_ext: &str) -> Result<Vec<DiscoveredDirectory>> {
    let mut dirs: BTreeMap<PathBuf, usize> = BTreeMap::new();
    for file in find_tracked_files(root, tracked_ext)? {
        if let Some(parent) = file.parent() {
            *dirs.entry(parent.to_path_buf()).or_default() += 1;
        }
    }
    info!(root = %root.display(), directories = dirs.len(), "Scan complete");
    Ok(dirs
        .into_iter()
        .map(|(path, tracked_files)| DiscoveredDirectory {
            path,
            tracked_files,
        })
        .collect())
}

/// Read a directory list: one path per line, surrounding whitespace and blank
/// lines ignored, duplicates dropped (first occurrence wins).
pub fn read_dirs_file(path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read directory list '{}'", path.display()))?;
    let mut seen = std::collections::HashSet::new();
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .filter(|p| seen.insert(p.clone()))
        .collect())
}
