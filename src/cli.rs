//! CLI definition and parsing.
//! Defines Args (global flags + one subcommand) and how they override Config.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - ROOT may be omitted when the config file sets materials_dir.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::parse_extensions;
use crate::config::types::{Config, LogLevel};
use crate::fs_ops::{CollisionPolicy, normalize_extension};

/// Rewrite texture paths in VMT material files and reorganize their directories.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Rewrite VMT texture paths and reorganize material directories")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to use instead of $VMT_REBASE_CONFIG / the platform default.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Append logs to this file as well as stderr.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Dry-run: report actions but do not modify the filesystem.
    #[arg(long, global = true, help = "Show what would be done, but do not modify files/directories")]
    pub dry_run: bool,

    /// What to do when a destination entry already exists.
    #[arg(long, global = true, value_name = "POLICY", help = "On name collision: skip, overwrite, rename, fail")]
    pub on_collision: Option<CollisionPolicy>,

    /// Extension of the material files to rewrite and scan for (default vmt).
    #[arg(long, global = true, value_name = "EXT")]
    pub tracked_ext: Option<String>,

    /// Also list unchanged files in reports.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List directories that contain tracked material files.
    Scan {
        #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
        root: Option<PathBuf>,
    },
    /// Point every path in every material file at a new base.
    Rewrite {
        #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
        root: Option<PathBuf>,
        /// Base path for rewritten values, e.g. models/props/v2
        #[arg(long, value_name = "PATH")]
        new_base: Option<String>,
    },
    /// Rename (or merge) each discovered directory to <prefix><name>.
    Rename {
        #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
        root: Option<PathBuf>,
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
        /// Directory list (one per line) used instead of scanning ROOT.
        #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
        dirs_file: Option<PathBuf>,
    },
    /// Move files with chosen extensions into <dest>/<prefix><name>.
    Move {
        #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
        root: Option<PathBuf>,
        #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
        dest: Option<PathBuf>,
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
        /// Comma separated extensions to move (default vmt,vtf).
        #[arg(long, value_name = "LIST")]
        ext: Option<String>,
        #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
        dirs_file: Option<PathBuf>,
    },
    /// Write a commented template config file and exit.
    InitConfig,
    /// Print where the config file is looked up and exit.
    PrintConfig,
}

impl Command {
    /// Directory list file, for the commands that take one.
    pub fn dirs_file(&self) -> Option<&PathBuf> {
        match self {
            Command::Rename { dirs_file, .. } | Command::Move { dirs_file, .. } => dirs_file.as_ref(),
            _ => None,
        }
    }
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if let Some(p) = self.on_collision {
            cfg.on_collision = p;
        }
        if let Some(ext) = &self.tracked_ext {
            cfg.tracked_extension = normalize_extension(ext);
        }

        match &self.command {
            Command::Scan { root } => set_if(&mut cfg.materials_dir, root),
            Command::Rewrite { root, new_base } => {
                set_if(&mut cfg.materials_dir, root);
                set_if(&mut cfg.new_base_path, new_base);
            }
            Command::Rename { root, prefix, .. } => {
                set_if(&mut cfg.materials_dir, root);
                set_if(&mut cfg.prefix_suffix, prefix);
            }
            Command::Move {
                root,
                dest,
                prefix,
                ext,
                ..
            } => {
                set_if(&mut cfg.materials_dir, root);
                set_if(&mut cfg.destination_root, dest);
                set_if(&mut cfg.prefix_suffix, prefix);
                if let Some(list) = ext {
                    cfg.move_extensions = parse_extensions(list)?;
                }
            }
            Command::InitConfig | Command::PrintConfig => {}
        }
        Ok(())
    }
}

fn set_if<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *slot = Some(v.clone());
    }
}

pub fn parse() -> Args {
    Args::parse()
}
