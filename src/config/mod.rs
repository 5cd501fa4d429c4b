//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{crash_log_path, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use validate::{normalize_new_base, parse_extensions, validate_materials_dir, validate_prefix};
pub use xml::{create_template_config, load_config, load_config_from_xml_path, parse_config_xml};

/// Environment variable naming an explicit config file (or directory holding config.xml).
pub const CONFIG_ENV: &str = "VMT_REBASE_CONFIG";
/// Directory name used under the platform config/data dirs.
pub const APP_DIR: &str = "vmt_rebase";
pub const DEFAULT_TRACKED_EXTENSION: &str = "vmt";
pub const DEFAULT_MOVE_EXTENSIONS: &[&str] = &["vmt", "vtf"];
