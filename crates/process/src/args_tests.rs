// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn splits_plain_whitespace() {
    assert_eq!(split_args("--port 8080 --verbose"), vec!["--port", "8080", "--verbose"]);
}

#[test]
fn keeps_quoted_segment_as_one_argument() {
    assert_eq!(
        split_args(r#"--name "my service" --port 80"#),
        vec!["--name", "my service", "--port", "80"]
    );
}

#[test]
fn empty_string_yields_no_args() {
    assert!(split_args("").is_empty());
    assert!(split_args("   ").is_empty());
}

#[test]
fn collapses_repeated_whitespace() {
    assert_eq!(split_args("a    b\tc"), vec!["a", "b", "c"]);
}
