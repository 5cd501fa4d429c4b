use std::fs;
use std::path::Path;
use tempfile::tempdir;

use vmt_rebase::RebaseError;
use vmt_rebase::fs_ops::{explain_io_error, io_error_with_help};

#[test]
fn io_error_with_help_names_operation_and_path() {
    let td = tempdir().unwrap();
    let missing = td.path().join("missing.vmt");
    let err = fs::read(&missing)
        .map_err(io_error_with_help("read material", &missing))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("read material '"), "msg was: {msg}");
    assert!(msg.contains("missing.vmt"));
    assert!(msg.contains("path not found"));
}

#[test]
fn explain_io_error_without_os_code() {
    let e = std::io::Error::new(std::io::ErrorKind::Other, "boom");
    let msg = explain_io_error("move file", Path::new("a/b.vtf"), &e);
    assert_eq!(msg, "move file 'a/b.vtf': boom");
}

#[test]
fn error_codes_are_stable() {
    let p = Path::new("x").to_path_buf();
    let cases = [
        (RebaseError::Read { path: p.clone(), cause: "c".into() }, 10, "read_error"),
        (RebaseError::Write { path: p.clone(), cause: "c".into() }, 20, "write_error"),
        (
            RebaseError::Rename { from: p.clone(), to: p.clone(), cause: "c".into() },
            30,
            "rename_error",
        ),
        (RebaseError::Collision { path: p }, 31, "collision"),
        (RebaseError::Interrupted, 130, "interrupted"),
    ];
    for (err, code, kind) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.kind(), kind);
    }
}
