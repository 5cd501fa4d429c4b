//! All-or-nothing file primitives.
//! - `replace_file_contents`: temp sibling + fsync + rename over the original.
//! - `move_file`: rename, falling back to copy + rename + remove across filesystems.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

use super::util::{is_cross_device, unique_temp_path};

/// Replace the contents of `path` with `contents`. The original keeps its
/// permissions. If anything fails before the rename, `path` is untouched.
pub fn replace_file_contents(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let perms = fs::metadata(path)?.permissions();

    let tmp = unique_temp_path(parent);
    let result = (|| -> io::Result<()> {
        let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
        drop(f);
        fs::set_permissions(&tmp, perms)?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    #[cfg(unix)]
    {
        // Best-effort: persist the rename itself.
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}

/// Move a single file to `dst`. Overwrites an existing file at `dst`;
/// collision decisions belong to the caller.
pub fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), dst = %dst.display(), "cross-device move; copying instead");
            copy_then_remove(src, dst)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    let dst_dir = dst
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let tmp = unique_temp_path(dst_dir);

    let copied = (|| -> io::Result<()> {
        fs::copy(src, &tmp)?;
        File::open(&tmp)?.sync_all()?;
        fs::rename(&tmp, dst)
    })();
    if let Err(e) = copied {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::remove_file(src) {
        warn!(error = %e, src = %src.display(), "copied to destination but could not remove source");
        return Err(e);
    }
    Ok(())
}
