// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn rotate_is_a_no_op_below_the_size_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supervisor.log");
    std::fs::write(&path, b"small").unwrap();

    rotate_log_if_needed(&path);

    assert!(path.exists());
    assert!(!dir.path().join("supervisor.log.1").exists());
}

#[test]
fn rotate_shifts_existing_backups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supervisor.log");
    std::fs::write(&path, vec![b'x'; MAX_LOG_SIZE as usize]).unwrap();
    std::fs::write(dir.path().join("supervisor.log.1"), b"oldest-1").unwrap();

    rotate_log_if_needed(&path);

    assert!(!path.exists(), "the oversized active file was rotated away");
    assert!(dir.path().join("supervisor.log.1").exists());
    assert!(dir.path().join("supervisor.log.2").exists());
    assert_eq!(std::fs::read(dir.path().join("supervisor.log.2")).unwrap(), b"oldest-1");
}

#[test]
fn startup_marker_includes_the_current_pid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("supervisor.log");

    write_startup_marker(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains(&std::process::id().to_string()));
    assert!(contents.starts_with(STARTUP_MARKER_PREFIX));
}
