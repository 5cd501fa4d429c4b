//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`init-config`).
//!
//! Notes:
//! - Unknown XML fields are an error so typos surface instead of being ignored.
//! - Empty elements count as unset.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::validate::parse_extensions;
use super::{DEFAULT_MOVE_EXTENSIONS, DEFAULT_TRACKED_EXTENSION};

use crate::fs_ops::CollisionPolicy;
use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    materials_dir: Option<String>,
    new_base_path: Option<String>,
    prefix_suffix: Option<String>,
    destination_root: Option<String>,
    tracked_extension: Option<String>,
    move_extensions: Option<String>,
    on_collision: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config, rejecting values that do not parse.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config {
        materials_dir: non_empty(parsed.materials_dir).map(PathBuf::from),
        new_base_path: non_empty(parsed.new_base_path),
        prefix_suffix: non_empty(parsed.prefix_suffix),
        destination_root: non_empty(parsed.destination_root).map(PathBuf::from),
        log_file: non_empty(parsed.log_file).map(PathBuf::from),
        ..Config::default()
    };

    if let Some(ext) = non_empty(parsed.tracked_extension) {
        cfg.tracked_extension = crate::fs_ops::normalize_extension(&ext);
    }
    if let Some(list) = non_empty(parsed.move_extensions) {
        cfg.move_extensions = parse_extensions(&list).context("move_extensions")?;
    }
    if let Some(s) = non_empty(parsed.on_collision) {
        cfg.on_collision = s
            .parse::<CollisionPolicy>()
            .map_err(anyhow::Error::msg)
            .context("on_collision")?;
    }
    if let Some(s) = non_empty(parsed.log_level) {
        cfg.log_level = s
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)
            .context("log_level")?;
    }
    Ok(cfg)
}

/// Parse config XML text.
pub fn parse_config_xml(contents: &str) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(contents)?;
    xml_to_config(parsed)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let cfg = parse_config_xml(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    debug!(path = %path.display(), "Loaded config");
    Ok(cfg)
}

/// Load the config to use for this run.
///
/// An explicit path must exist. Otherwise the default location is tried and a
/// missing file means "no config" (`Ok(None)`).
pub fn load_config(explicit: Option<&Path>) -> Result<Option<(PathBuf, Config)>> {
    if let Some(p) = explicit {
        let cfg = load_config_from_xml_path(p)?;
        return Ok(Some((p.to_path_buf(), cfg)));
    }
    let path = match default_config_path() {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "No default config location");
            return Ok(None);
        }
    };
    if !path.exists() {
        return Ok(None);
    }
    let cfg = load_config_from_xml_path(&path)?;
    Ok(Some((path, cfg)))
}

fn template() -> String {
    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/vmt_rebase.log".into());
    format!(
        "<!--\n  vmt_rebase configuration (XML)\n\n  materials_dir      -> root of the material tree (used when ROOT is omitted)\n  new_base_path      -> base path written into rewritten values, e.g. models/props/v2\n  prefix_suffix      -> string prepended to directory names by rename/move\n  destination_root   -> target tree for the move command\n  tracked_extension  -> files that get rewritten (default {DEFAULT_TRACKED_EXTENSION})\n  move_extensions    -> comma list of extensions the move command relocates\n  on_collision       -> skip | overwrite | rename | fail\n  log_level          -> quiet | normal | info | debug\n  log_file           -> optional log file (stdout is still used)\n\n  CLI flags override these values. Leave an element empty to unset it.\n-->\n<config>\n  <materials_dir></materials_dir>\n  <new_base_path></new_base_path>\n  <prefix_suffix></prefix_suffix>\n  <destination_root></destination_root>\n  <tracked_extension>{DEFAULT_TRACKED_EXTENSION}</tracked_extension>\n  <move_extensions>{}</move_extensions>\n  <on_collision>skip</on_collision>\n  <log_level>normal</log_level>\n  <log_file>{suggested_log}</log_file>\n</config>\n",
        DEFAULT_MOVE_EXTENSIONS.join(",")
    )
}

/// Create the template config file and its parent directory.
/// Refuses to overwrite and refuses paths below a symlink.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    write_config_secure_new_0600(path, template().as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_back() {
        let cfg = parse_config_xml(&template()).unwrap();
        assert_eq!(cfg.materials_dir, None);
        assert_eq!(cfg.tracked_extension, "vmt");
        assert_eq!(cfg.move_extensions, vec!["vmt".to_string(), "vtf".to_string()]);
        assert_eq!(cfg.on_collision, CollisionPolicy::Skip);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = parse_config_xml("<config><materials_dir>/m</materials_dir><bogus>1</bogus></config>");
        assert!(err.is_err());
    }

    #[test]
    fn bad_policy_is_rejected() {
        let err = parse_config_xml("<config><on_collision>clobber</on_collision></config>").unwrap_err();
        assert!(format!("{err:#}").contains("on_collision"));
    }
}
