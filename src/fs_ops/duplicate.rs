//! Name-collision policy for merges and selective moves.
//!
//! Policy:
//! - Skip: leave the source entry where it is and report it.
//! - Overwrite: replace the destination file (never a directory).
//! - Rename: move under a free name, appending " (n)" before the extension.
//! - Fail: refuse; for a directory merge nothing is moved at all.
//!
//! Two directories with the same name are never a collision: merges recurse
//! into them.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    #[default]
    Skip,
    Overwrite,
    Rename,
    Fail,
}

impl CollisionPolicy {
    /// Parse common names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "keep" | "skip-existing" => Some(CollisionPolicy::Skip),
            "overwrite" | "replace" => Some(CollisionPolicy::Overwrite),
            "rename" | "suffix" => Some(CollisionPolicy::Rename),
            "fail" | "error" | "abort" => Some(CollisionPolicy::Fail),
            _ => None,
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollisionPolicy::Skip => "skip",
            CollisionPolicy::Overwrite => "overwrite",
            CollisionPolicy::Rename => "rename",
            CollisionPolicy::Fail => "fail",
        };
        f.write_str(s)
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid collision policy: '{s}' (skip|overwrite|rename|fail)"))
    }
}

/// First free path in `dst_dir` for `name`: "name.ext", "name (2).ext", ...
///
/// Examples:
/// - "foo.vtf" -> "foo (2).vtf"
/// - "archive.tar.gz" -> "archive.tar (2).gz"
/// - "crate" (a directory) -> "crate (2)"
pub fn unique_name_in(dst_dir: &Path, name: &OsStr) -> PathBuf {
    let candidate = dst_dir.join(name);
    if !exists_no_follow(&candidate) {
        return candidate;
    }

    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    let ext = base.extension();

    let mut n: u64 = 2;
    loop {
        let mut new_name = stem.clone();
        new_name.push(format!(" ({n})"));
        if let Some(e) = ext {
            new_name.push(".");
            new_name.push(e);
        }
        let p = dst_dir.join(&new_name);
        if !exists_no_follow(&p) {
            return p;
        }
        if n % 100 == 0 {
            trace!(name = ?name, dir = %dst_dir.display(), tries = n, "still searching for a free name");
        }
        n += 1;
    }
}

/// Existence check that treats a dangling symlink as present.
pub(crate) fn exists_no_follow(p: &Path) -> bool {
    std::fs::symlink_metadata(p).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_and_display_roundtrip() {
        for p in [
            CollisionPolicy::Skip,
            CollisionPolicy::Overwrite,
            CollisionPolicy::Rename,
            CollisionPolicy::Fail,
        ] {
            assert_eq!(p.to_string().parse::<CollisionPolicy>(), Ok(p));
        }
        assert_eq!(CollisionPolicy::parse("REPLACE"), Some(CollisionPolicy::Overwrite));
        assert!("clobber".parse::<CollisionPolicy>().is_err());
        assert_eq!(CollisionPolicy::default(), CollisionPolicy::Skip);
    }

    #[test]
    fn free_name_is_returned_as_is() {
        let td = tempdir().unwrap();
        let p = unique_name_in(td.path(), OsStr::new("a.vtf"));
        assert_eq!(p, td.path().join("a.vtf"));
    }

    #[test]
    fn suffix_increments_past_existing() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.vtf"), b"1").unwrap();
        fs::write(td.path().join("a (2).vtf"), b"2").unwrap();
        let p = unique_name_in(td.path(), OsStr::new("a.vtf"));
        assert_eq!(p, td.path().join("a (3).vtf"));
    }

    #[test]
    fn directory_names_get_suffix_without_extension() {
        let td = tempdir().unwrap();
        fs::create_dir(td.path().join("crate")).unwrap();
        let p = unique_name_in(td.path(), OsStr::new("crate"));
        assert_eq!(p, td.path().join("crate (2)"));
    }
}
