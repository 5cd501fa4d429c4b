//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler,
//! validates inputs and runs the requested batch operation.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use vmt_rebase::cli::{Args, Command};
use vmt_rebase::config::{
    CONFIG_ENV, create_template_config, load_config, validate_materials_dir, validate_prefix,
};
use vmt_rebase::fs_ops::read_dirs_file;
use vmt_rebase::output as out;
use vmt_rebase::{
    Config, MoveOptions, Outcome, RebaseError, RunReport, default_config_path, move_selected,
    plan_rewrites, reorganize_dirs, scan, shutdown,
};

use crate::logging::init_tracing;

/// Exit status when some items failed but the run itself completed.
const EXIT_ITEM_FAILURES: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    // Config housekeeping commands run before logging init.
    match &args.command {
        Command::PrintConfig => {
            print_config(args.config.as_deref());
            return Ok(ExitCode::SUCCESS);
        }
        Command::InitConfig => {
            init_config(args.config.as_deref())?;
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let mut cfg = match load_config(args.config.as_deref()) {
        Ok(Some((_, cfg))) => cfg,
        Ok(None) => Config::default(),
        Err(e) => {
            out::print_error(&format!("Invalid config: {e:#}"));
            return Err(e);
        }
    };
    args.apply_overrides(&mut cfg)?;

    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current item and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install Ctrl-C handler")?;
    }

    debug!(?args, "Starting vmt_rebase");

    let result = dispatch(&args.command, &cfg, args.verbose);
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "Run failed");
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn dispatch(command: &Command, cfg: &Config, verbose: bool) -> Result<ExitCode> {
    let opts = MoveOptions {
        on_collision: cfg.on_collision,
        dry_run: cfg.dry_run,
    };
    match command {
        Command::Scan { .. } => {
            let root = materials_root(cfg)?;
            let dirs = scan(&root, &cfg.tracked_extension)?;
            for d in &dirs {
                out::print_user(&d.path.display().to_string());
            }
            info!(directories = dirs.len(), root = %root.display(), "Directories with .{} files", cfg.tracked_extension);
            Ok(ExitCode::SUCCESS)
        }
        Command::Rewrite { .. } => {
            let root = materials_root(cfg)?;
            let new_base = cfg
                .new_base_path
                .as_deref()
                .ok_or_else(|| anyhow!("missing --new-base (or new_base_path in the config file)"))?;
            let plan = plan_rewrites(&root, new_base, &cfg.tracked_extension)?;
            let report = if shutdown::is_requested() {
                plan.cancel()
            } else {
                plan.commit(cfg.dry_run)
            };
            Ok(finish(&report, verbose))
        }
        Command::Rename { dirs_file, .. } => {
            let prefix = cfg
                .prefix_suffix
                .as_deref()
                .ok_or_else(|| anyhow!("missing --prefix (or prefix_suffix in the config file)"))?;
            validate_prefix(prefix)?;
            let dirs = discovered_dirs(dirs_file.as_deref(), cfg)?;
            let report = reorganize_dirs(&dirs, prefix, &opts);
            Ok(finish(&report, verbose))
        }
        Command::Move { dirs_file, .. } => {
            let dest = cfg
                .destination_root
                .as_deref()
                .ok_or_else(|| anyhow!("missing --dest (or destination_root in the config file)"))?;
            let prefix = cfg.prefix_suffix.as_deref().unwrap_or("");
            if !prefix.is_empty() {
                validate_prefix(prefix)?;
            }
            let dirs = discovered_dirs(dirs_file.as_deref(), cfg)?;
            let report = move_selected(&dirs, dest, prefix, &cfg.move_extensions, &opts);
            Ok(finish(&report, verbose))
        }
        Command::InitConfig | Command::PrintConfig => Ok(ExitCode::SUCCESS),
    }
}

fn materials_root(cfg: &Config) -> Result<PathBuf> {
    let root = cfg
        .materials_dir
        .as_deref()
        .ok_or_else(|| anyhow!("missing ROOT (or materials_dir in the config file)"))?;
    validate_materials_dir(root)
}

/// Directories to reorganize: from the list file when given, else a fresh scan.
fn discovered_dirs(dirs_file: Option<&Path>, cfg: &Config) -> Result<Vec<PathBuf>> {
    if let Some(list) = dirs_file {
        let dirs = read_dirs_file(list)?;
        info!(count = dirs.len(), list = %list.display(), "Using directory list");
        return Ok(dirs);
    }
    let root = materials_root(cfg)?;
    Ok(scan(&root, &cfg.tracked_extension)?
        .into_iter()
        .map(|d| d.path)
        .collect())
}

fn finish(report: &RunReport, verbose: bool) -> ExitCode {
    out::print_report(report, verbose);
    let interrupted = report
        .failures()
        .any(|e| matches!(e.outcome, Outcome::Failed(RebaseError::Interrupted)));
    if interrupted {
        ExitCode::from(EXIT_INTERRUPTED)
    } else if report.has_failures() {
        ExitCode::from(EXIT_ITEM_FAILURES)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_config(explicit: Option<&Path>) {
    if let Some(p) = explicit {
        out::print_info(&format!("Using --config (explicit):\n  {}\n", p.display()));
        return;
    }
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {}\n", cfg_env));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default vmt_rebase config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run `vmt_rebase init-config` to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

fn init_config(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    create_template_config(&path).map_err(|e| {
        out::print_error(&format!("{e:#}"));
        e
    })?;
    out::print_success(&format!("A template vmt_rebase config was written to: {}", path.display()));
    out::print_info(&format!("Edit it, then run a command. To use a different location set {CONFIG_ENV} or pass --config."));
    Ok(())
}
