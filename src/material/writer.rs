//! Change writer: persists a rewrite with the encoding captured at load time.
//! The new contents land through a temp sibling + rename, so a failed write
//! leaves the original file as it was.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::errors::RebaseError;
use crate::fs_ops::{explain_io_error, replace_file_contents};

use super::rewrite::RewriteResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File replaced; carries the number of changes written.
    Written { path: PathBuf, changes: usize },
    /// Zero changes; the file was not touched.
    NotACandidate { path: PathBuf },
}

/// Write `result` back to its source path. Consumes the result.
pub fn apply(result: RewriteResult) -> Result<WriteOutcome, RebaseError> {
    let changes = result.changes().len();
    let text = result.text();
    let (source, _) = result.into_parts();
    let path = source.path().to_path_buf();

    if changes == 0 {
        debug!(path = %path.display(), "no changes; leaving file untouched");
        return Ok(WriteOutcome::NotACandidate { path });
    }

    let enc = source.encoding();
    let bytes = enc.encode(&text).map_err(|c| RebaseError::Write {
        path: path.clone(),
        cause: format!("character {c:?} cannot be represented in {enc}"),
    })?;

    replace_file_contents(&path, &bytes).map_err(|e| RebaseError::Write {
        path: path.clone(),
        cause: explain_io_error("replace file", &path, &e),
    })?;

    info!(path = %path.display(), encoding = %enc, changes, "Rewrote material file");
    Ok(WriteOutcome::Written { path, changes })
}
