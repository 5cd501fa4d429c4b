//! Panic hook that appends a crash report to `crash.log` before the default
//! hook prints its message.

use anyhow::Result;
use chrono::Local;
use std::backtrace::Backtrace;
use std::io::Write;
use std::panic::{self, PanicHookInfo};
use std::path::PathBuf;

use vmt_rebase::config::crash_log_path;
use vmt_rebase::platform::open_log_file_secure_append;

pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        match write_crash_report(info) {
            Ok(path) => eprintln!("Crash report written to {}", path.display()),
            Err(e) => eprintln!("Could not write crash report: {e:#}"),
        }
        default_hook(info);
    }));
}

fn payload_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn format_report(when: &str, location: &str, message: &str, backtrace: &str) -> String {
    format!(
        "==== {when} vmt_rebase {} crashed\nat: {location}\nmessage: {message}\nbacktrace:\n{backtrace}\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn write_crash_report(info: &PanicHookInfo<'_>) -> Result<PathBuf> {
    let path = crash_log_path()?;
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "<unknown>".into());
    let report = format_report(
        &Local::now().format("%d/%m/%y %H:%M:%S").to_string(),
        &location,
        &payload_message(info),
        &Backtrace::force_capture().to_string(),
    );
    let mut f = open_log_file_secure_append(&path)?;
    f.write_all(report.as_bytes())?;
    Ok(path)
}
