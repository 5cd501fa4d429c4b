//! Core library for `vmt_rebase`.
//!
//! Rewrites the texture paths inside VMT material files so they point at a
//! new base directory, and reorganizes the directories holding them.
//!
//! Operations:
//! - [`scan`]: directories under a root that contain tracked files
//! - [`rewrite_paths`] / [`plan_rewrites`]: load, rewrite in memory, then commit or cancel
//! - [`reorganize_dirs`]: rename or merge each directory to `<prefix><name>`
//! - [`move_selected`]: move only chosen file types into a destination tree
//!
//! Every batch operation returns a [`RunReport`] with one entry per item;
//! a failing item never stops the rest.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod material;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod report;
pub mod shutdown;

pub use config::{Config, LogLevel, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use errors::RebaseError;
pub use fs_ops::{
    CollisionPolicy, DiscoveredDirectory, MoveOptions, RenamePlan, move_selected, reorganize_dirs,
    scan,
};
pub use material::{ChangeKey, PathChange, RewriteResult, SourceFile, TextEncoding};
pub use pipeline::{RewritePlan, plan_rewrites, rewrite_paths};
pub use report::{Outcome, RunReport, Summary};
