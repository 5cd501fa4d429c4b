//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use anyhow::{Result, anyhow};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{APP_DIR, CONFIG_ENV};

fn home_fallback(parts: &[&str]) -> Option<PathBuf> {
    env::var_os("HOME").map(|h| parts.iter().fold(PathBuf::from(h), |p, s| p.join(s)))
}

/// Config file location: `$VMT_REBASE_CONFIG` when set (a directory means
/// `<dir>/config.xml`), otherwise the platform config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        let p = PathBuf::from(p);
        return Ok(if p.is_dir() { p.join("config.xml") } else { p });
    }
    config_dir()
        .map(|base| base.join(APP_DIR).join("config.xml"))
        .or_else(|| home_fallback(&[".config", APP_DIR, "config.xml"]))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no config dir and no HOME)"))
}

/// Default log file path. Next to the config file when `$VMT_REBASE_CONFIG`
/// is set, otherwise in the platform data dir. Nothing is created.
pub fn default_log_path() -> Result<PathBuf> {
    if env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty()) {
        let cfg = default_config_path()?;
        let dir = cfg
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        return Ok(dir.join("vmt_rebase.log"));
    }
    data_dir()
        .map(|base| base.join(APP_DIR).join("vmt_rebase.log"))
        .or_else(|| home_fallback(&[".local", "share", APP_DIR, "vmt_rebase.log"]))
        .ok_or_else(|| anyhow!("cannot determine a data directory (no data dir and no HOME)"))
}

/// `crash.log` next to the default log file.
pub fn crash_log_path() -> Result<PathBuf> {
    let log = default_log_path()?;
    Ok(log.with_file_name("crash.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ancestors_are_not_symlinks() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("a/b/c/log.txt");
        assert!(!path_has_symlink_ancestor(&p).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempfile::tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("x.log")).unwrap());
    }

    #[test]
    fn crash_log_sits_next_to_default_log() {
        if let (Ok(log), Ok(crash)) = (default_log_path(), crash_log_path()) {
            assert_eq!(log.parent(), crash.parent());
            assert_eq!(crash.file_name().unwrap(), "crash.log");
        }
    }
}
