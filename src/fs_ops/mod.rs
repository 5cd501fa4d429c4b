//! Filesystem operations: tree scan, atomic file primitives, directory
//! reorganization and selective moves.

mod atomic;
mod duplicate;
mod helpers;
mod reorganize;
mod scan;
mod selective;
mod util;

pub use atomic::{move_file, replace_file_contents};
pub use duplicate::{CollisionPolicy, unique_name_in};
pub use helpers::{explain_io_error, io_error_with_help};
pub use reorganize::{MoveOptions, RenamePlan, reorganize_dirs};
pub use scan::{
    DiscoveredDirectory, find_tracked_files, has_extension, normalize_extension, read_dirs_file,
    scan,
};
pub use selective::move_selected;
