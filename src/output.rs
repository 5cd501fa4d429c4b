//! User-facing lines on stdout/stderr, colored only when stdout is a TTY.
//! Structured diagnostics go through tracing; this is for results people read.

use owo_colors::OwoColorize;

use crate::report::{Outcome, ReportEntry, RunReport};

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain line (no prefix) for output users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

fn print_entry(entry: &ReportEntry) {
    let line = format!("{}: {}", entry.path.display(), entry.outcome);
    match &entry.outcome {
        Outcome::Failed(_) => print_error(&line),
        Outcome::Skipped { .. } | Outcome::Cancelled => print_warn(&line),
        _ => print_user(&line),
    }
}

/// Print every entry, every recorded path change, then the summary.
/// Unchanged files are only listed when `verbose`.
pub fn print_report(report: &RunReport, verbose: bool) {
    for entry in &report.entries {
        if !verbose && entry.outcome == Outcome::Unchanged {
            continue;
        }
        print_entry(entry);
    }
    for rec in &report.changes {
        print_user(&format!("  {} {}", rec.path.display(), rec.change));
    }
    let summary = report.summary().to_string();
    if report.has_failures() {
        print_warn(&summary);
    } else {
        print_success(&summary);
    }
}
