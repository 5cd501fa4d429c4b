//! Encoding-tolerant loading of material files.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::RebaseError;
use crate::fs_ops::explain_io_error;

use super::encoding::{CANDIDATES, TextEncoding};

/// A material file as read from disk. The encoding is fixed here and reused
/// verbatim by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    encoding: TextEncoding,
    text: String,
}

impl SourceFile {
    /// Wrap already-decoded text; used by callers that obtained the bytes elsewhere.
    pub fn new(path: impl Into<PathBuf>, encoding: TextEncoding, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            encoding,
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines with their terminators kept, so concatenation gives back `text`.
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.text)
    }
}

/// Split on `\n`, keeping it (and a preceding `\r`) attached to the line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Read `path` and decode it with the first candidate encoding that accepts it.
pub fn load(path: &Path) -> Result<SourceFile, RebaseError> {
    let bytes = fs::read(path).map_err(|e| RebaseError::Read {
        path: path.to_path_buf(),
        cause: explain_io_error("read file", path, &e),
    })?;
    decode_with_candidates(path, &bytes, &CANDIDATES)
}

/// Decode `bytes` trying `candidates` in order.
pub fn decode_with_candidates(
    path: &Path,
    bytes: &[u8],
    candidates: &[TextEncoding],
) -> Result<SourceFile, RebaseError> {
    for &enc in candidates {
        if let Some(text) = enc.decode(bytes) {
            debug!(path = %path.display(), encoding = %enc, "decoded material file");
            return Ok(SourceFile::new(path, enc, text));
        }
    }
    Err(RebaseError::Read {
        path: path.to_path_buf(),
        cause: format!(
            "no candidate encoding could decode it (tried {})",
            candidates
                .iter()
                .map(|e| e.label())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })
}
