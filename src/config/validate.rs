//! Input validation for run parameters.
//! Checks the material root, the new base path, the prefix and extension lists
//! before any batch operation starts.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs_ops::normalize_extension;

/// Normalize a base path for rewritten values: trimmed, forward slashes, no
/// trailing slash. Quotes are rejected since they would break the quoted value.
pub fn normalize_new_base(raw: &str) -> Result<String> {
    let base = raw.trim().replace('\\', "/");
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        bail!("new base path is empty");
    }
    if base.contains('"') || base.contains('\'') {
        bail!("new base path '{base}' must not contain quotes");
    }
    Ok(base.to_string())
}

/// A prefix becomes part of a single directory name.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        bail!("prefix is empty; directories would keep their names");
    }
    if prefix.contains(['/', '\\', '\0']) {
        bail!("prefix '{prefix}' must not contain path separators");
    }
    Ok(())
}

/// The material root must be an existing, readable directory.
pub fn validate_materials_dir(path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(path)
        .with_context(|| format!("materials directory '{}' is not accessible", path.display()))?;
    if !meta.is_dir() {
        bail!("materials directory '{}' is not a directory", path.display());
    }
    fs::read_dir(path).with_context(|| {
        format!(
            "cannot read materials directory '{}'; check permissions",
            path.display()
        )
    })?;
    let real = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    debug!(root = %real.display(), "materials directory ok");
    Ok(real)
}

/// Parse a comma separated extension list: "vmt, .VTF" -> ["vmt", "vtf"].
pub fn parse_extensions(list: &str) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for ext in list.split(',').map(normalize_extension).filter(|e| !e.is_empty()) {
        if !out.contains(&ext) {
            out.push(ext);
        }
    }
    if out.is_empty() {
        bail!("extension list '{list}' is empty");
    }
    Ok(out)
}
