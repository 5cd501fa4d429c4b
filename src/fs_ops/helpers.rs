//! I/O error hints.
//!
//! Turns a bare io::Error into a message naming the operation, the path and,
//! where the OS code is recognizable, what the user can do about it.
//!
//! Usage:
//!   // report causes
//!   let cause = explain_io_error("rename directory", dir, &e);
//!
//!   // in functions returning anyhow::Result<_>
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

#[cfg(unix)]
fn hint_for_os_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem; a plain rename is not possible",
        libc::EBUSY => "resource busy; close programs using this path (e.g. the game or an editor)",
        libc::ENOENT => "path not found; it may have been moved since the scan",
        libc::EEXIST => "already exists",
        libc::ENOTEMPTY => "directory not empty",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem",
        libc::ENAMETOOLONG => "filename or path too long; shorten the prefix or base path",
        libc::ELOOP => "too many symbolic link levels",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn hint_for_os_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",                       // ERROR_ACCESS_DENIED
        17 => "not same device; a plain rename is not possible",        // ERROR_NOT_SAME_DEVICE
        32 => "sharing violation; file is in use",                      // ERROR_SHARING_VIOLATION
        2 | 3 => "path not found; it may have been moved since the scan", // FILE/PATH NOT FOUND
        80 | 183 => "already exists",                                   // FILE_EXISTS / ALREADY_EXISTS
        145 => "directory not empty",                                   // ERROR_DIR_NOT_EMPTY
        112 => "insufficient disk space",                               // ERROR_DISK_FULL
        206 => "filename or path too long (MAX_PATH exceeded)",         // ERROR_FILENAME_EXCED_RANGE
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(any(unix, windows)))]
fn hint_for_os_code(_code: i32) -> Option<&'static str> {
    None
}

fn hint_for_kind(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved since the scan"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

/// Human-readable message for a failed filesystem operation.
pub fn explain_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{op} '{}': {e}", path.display());
    let hint = match e.raw_os_error() {
        Some(code) => hint_for_os_code(code),
        None => hint_for_kind(e.kind()),
    };
    if let Some(h) = hint {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Adapter for anyhow::Result code: `.map_err(io_error_with_help(op, path))`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(explain_io_error(op, path, &e))
}
