use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use assert_fs::TempDir;
use assert_fs::prelude::*;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

use vmt_rebase::platform::open_log_file_secure_append;
use vmt_rebase::{MoveOptions, path_has_symlink_ancestor, reorganize_dirs, rewrite_paths};

/// Appends written bytes into a shared Vec so the MakeWriter closure can clone it.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured<F: FnOnce()>(level: &str, json: bool, f: F) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let filter = EnvFilter::new(level);
    let dispatch = if json {
        tracing::Dispatch::new(
            registry()
                .with(filter)
                .with(tsfmt::layer().json().with_writer(make_writer)),
        )
    } else {
        tracing::Dispatch::new(
            registry()
                .with(filter)
                .with(tsfmt::layer().compact().with_writer(make_writer)),
        )
    };
    tracing::dispatcher::with_default(&dispatch, f);
    let bytes = buf.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn rename_is_logged_at_info() {
    let root = TempDir::new().unwrap();
    root.child("props/crate/a.vmt").write_str("x").unwrap();
    let src = root.path().join("props/crate");

    let logs = captured("info", false, || {
        reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());
    });
    assert!(logs.contains("Renamed directory"), "logs: {logs}");
    assert!(logs.contains("v2_crate"));
}

#[test]
fn rewrite_events_carry_structured_fields() {
    let root = TempDir::new().unwrap();
    root.child("m/a.vmt")
        .write_str("$basetexture \"old/dir/a\"\n")
        .unwrap();

    let logs = captured("info", true, || {
        rewrite_paths(root.path(), "models/new").unwrap();
    });
    let line = logs
        .lines()
        .find(|l| l.contains("Rewrote material file"))
        .unwrap_or_else(|| panic!("no rewrite event in: {logs}"));
    assert!(line.contains("\"encoding\":\"utf-8\""), "line: {line}");
    assert!(line.contains("\"changes\":1"), "line: {line}");
}

#[test]
fn quiet_filter_drops_info_events() {
    let root = TempDir::new().unwrap();
    root.child("props/crate/a.vmt").write_str("x").unwrap();
    let src = root.path().join("props/crate");

    let logs = captured("error", false, || {
        reorganize_dirs(&[src.clone()], "v2_", &MoveOptions::default());
    });
    assert!(logs.is_empty(), "logs: {logs}");
}

#[test]
fn file_sink_receives_events() {
    let td = TempDir::new().unwrap();
    let log_path = td.path().join("logs/vmt_rebase_test.log");
    if path_has_symlink_ancestor(&log_path).unwrap() {
        eprintln!("Skipping file logging test: path has symlink ancestor: {}", log_path.display());
        return;
    }

    let file = open_log_file_secure_append(&log_path).expect("open log file");
    let (writer, guard) = tracing_appender::non_blocking(file);
    let dispatch = tracing::Dispatch::new(
        registry()
            .with(EnvFilter::new("info"))
            .with(tsfmt::layer().with_ansi(false).with_writer(writer)),
    );
    tracing::dispatcher::with_default(&dispatch, || {
        tracing::info!("file-logging-test: written");
    });
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("file-logging-test"), "contents={contents}");
}
