//! Core configuration types.
//! - Config holds run settings; every field may be overridden from the CLI.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::CollisionPolicy;

use super::{DEFAULT_MOVE_EXTENSIONS, DEFAULT_TRACKED_EXTENSION};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings for one run. Unset optional fields must come from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the material tree
    pub materials_dir: Option<PathBuf>,
    /// Base path written into rewritten material values
    pub new_base_path: Option<String>,
    /// String prepended to directory names on rename/move
    pub prefix_suffix: Option<String>,
    /// Where the selective mover puts its directories
    pub destination_root: Option<PathBuf>,
    /// Extension of files that get rewritten and define discovered directories
    pub tracked_extension: String,
    /// Extensions the selective mover relocates
    pub move_extensions: Vec<String>,
    pub on_collision: CollisionPolicy,
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, report actions but do not modify the filesystem
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            materials_dir: None,
            new_base_path: None,
            prefix_suffix: None,
            destination_root: None,
            tracked_extension: DEFAULT_TRACKED_EXTENSION.to_string(),
            move_extensions: DEFAULT_MOVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            on_collision: CollisionPolicy::default(),
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
        }
    }
}
