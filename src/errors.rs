//! Typed error definitions for vmt_rebase.
//! Every variant is local to one file or directory; batch operations record
//! them into a `RunReport` and keep going.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebaseError {
    #[error("Cannot read {path}: {cause}")]
    Read { path: PathBuf, cause: String },

    #[error("Cannot write {path}: {cause}")]
    Write { path: PathBuf, cause: String },

    #[error("Cannot move {from} -> {to}: {cause}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        cause: String,
    },

    #[error("Destination already exists: {path}")]
    Collision { path: PathBuf },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl RebaseError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            RebaseError::Read { .. } => 10,
            RebaseError::Write { .. } => 20,
            RebaseError::Rename { .. } => 30,
            RebaseError::Collision { .. } => 31,
            RebaseError::Interrupted => 130,
        }
    }

    /// Short machine-friendly kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            RebaseError::Read { .. } => "read_error",
            RebaseError::Write { .. } => "write_error",
            RebaseError::Rename { .. } => "rename_error",
            RebaseError::Collision { .. } => "collision",
            RebaseError::Interrupted => "interrupted",
        }
    }
}
