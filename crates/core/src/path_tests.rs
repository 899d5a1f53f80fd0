// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn empty_path_is_invalid() {
    assert!(!is_valid_path(""));
}

#[test]
fn relative_path_is_invalid() {
    assert!(!is_valid_path("relative/app.exe"));
}

#[test]
fn parent_dir_segment_is_invalid() {
    assert!(!is_valid_path("/abs/../app.exe"));
}

#[yare::parameterized(
    less_than = { "/abs/a<b.exe" },
    greater_than = { "/abs/a>b.exe" },
    pipe = { "/abs/a|b.exe" },
    question_mark = { "/abs/a?b.exe" },
    asterisk = { "/abs/a*b.exe" },
)]
fn reserved_characters_are_invalid(bad: &str) {
    assert!(!is_valid_path(bad), "{bad} should be invalid");
}

#[test]
fn absolute_clean_path_is_valid() {
    assert!(is_valid_path("/abs/bin/app.exe"));
}

#[test]
#[serial]
fn expand_env_vars_substitutes_known_variable() {
    std::env::set_var("SERVY_TEST_VAR", "expanded");
    let out = expand_env_vars("/abs/%SERVY_TEST_VAR%/app.exe").unwrap();
    assert_eq!(out, "/abs/expanded/app.exe");
    std::env::remove_var("SERVY_TEST_VAR");
}

#[test]
#[serial]
fn expand_env_vars_fails_on_unresolved_reference() {
    std::env::remove_var("SERVY_TEST_MISSING");
    let err = expand_env_vars("/abs/%SERVY_TEST_MISSING%/app.exe").unwrap_err();
    assert!(err.contains("SERVY_TEST_MISSING"));
}

#[test]
fn expand_env_vars_handles_double_percent_as_literal() {
    let out = expand_env_vars("/abs/100%%/app.exe").unwrap();
    assert_eq!(out, "/abs/100%/app.exe");
}

#[test]
fn validate_exists_reports_false_for_missing_path() {
    let result = validate_exists("/definitely/does/not/exist.exe", PathKind::File).unwrap();
    assert!(!result);
}

#[test]
fn validate_exists_checks_kind() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("app.exe");
    std::fs::write(&file_path, b"").unwrap();

    let as_file = validate_exists(file_path.to_str().unwrap(), PathKind::File).unwrap();
    assert!(as_file);

    let as_dir = validate_exists(file_path.to_str().unwrap(), PathKind::Directory).unwrap();
    assert!(!as_dir);
}
