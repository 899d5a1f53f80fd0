// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument decoder (C3): turns the service manager's positional argument
//! vector into a typed [`ServiceDefinition`].
//!
//! Position layout (§4.3):
//!
//! ```text
//! [0]  invoker
//! [1]  executable_path
//! [2]  executable_args
//! [3]  working_directory
//! [4]  priority
//! [5]  stdout_path
//! [6]  stderr_path
//! [7]  rotation_size_bytes
//! [8]  heartbeat_interval_seconds
//! [9]  max_failed_checks
//! [10] recovery_action
//! [11] max_restart_attempts
//! [12] environment
//! [13] pre_launch.executable_path
//! [14] pre_launch.executable_args
//! [15] pre_launch.working_directory
//! [16] pre_launch.environment
//! [17] pre_launch.stdout_path
//! [18] pre_launch.stderr_path
//! [19] pre_launch.timeout_seconds
//! [20] pre_launch.retry_attempts
//! [21] pre_launch.ignore_failure
//! [22] service_name
//! ```
//!
//! Missing trailing positions take their documented defaults. Enumerations
//! are parsed case-insensitively; numeric positions that fail to parse also
//! take their defaults.

use crate::definition::{
    PreLaunchDef, Priority, RecoveryAction, ServiceDefinition, DEFAULT_HEARTBEAT_INTERVAL_SECONDS,
    DEFAULT_MAX_FAILED_CHECKS, DEFAULT_MAX_RESTART_ATTEMPTS, DEFAULT_PRE_LAUNCH_TIMEOUT_SECONDS,
    DEFAULT_ROTATION_SIZE_BYTES,
};
use crate::env::parse_environment;
use std::path::PathBuf;

/// The empty-positional-argument sentinel (§6): a literal two-character
/// string of paired quotes with nothing between them.
const EMPTY_SENTINEL: &str = "\"\"";

/// Trim surrounding whitespace, then strip one paired pair of outer double
/// quotes, per §4.3. The `""` sentinel reduces to the empty string.
fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == EMPTY_SENTINEL {
        return String::new();
    }
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

fn get(args: &[String], idx: usize) -> String {
    args.get(idx).map(|s| clean(s)).unwrap_or_default()
}

fn parse_u64_or(args: &[String], idx: usize, default: u64) -> u64 {
    let raw = get(args, idx);
    if raw.is_empty() {
        return default;
    }
    raw.parse().unwrap_or(default)
}

fn parse_u32_or(args: &[String], idx: usize, default: u32) -> u32 {
    let raw = get(args, idx);
    if raw.is_empty() {
        return default;
    }
    raw.parse().unwrap_or(default)
}

fn parse_bool_or(args: &[String], idx: usize, default: bool) -> bool {
    match get(args, idx).to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => default,
    }
}

fn parse_optional_path(args: &[String], idx: usize) -> Option<PathBuf> {
    let raw = get(args, idx);
    if raw.is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

fn parse_environment_or_empty(args: &[String], idx: usize) -> Vec<(String, String)> {
    let raw = get(args, idx);
    if raw.is_empty() {
        Vec::new()
    } else {
        parse_environment(&raw).unwrap_or_default()
    }
}

/// Decode a service manager argument vector into a [`ServiceDefinition`].
///
/// Returns `None` when `executable_path` (position 1) is empty — the
/// controller's contract for this case is "signal stop and return" (§4.3,
/// §4.8 step 1).
pub fn decode_args(args: &[String]) -> Option<ServiceDefinition> {
    let executable_path_raw = get(args, 1);
    if executable_path_raw.is_empty() {
        return None;
    }

    let pre_launch_exe = get(args, 13);
    let pre_launch = if pre_launch_exe.is_empty() {
        None
    } else {
        Some(PreLaunchDef {
            executable_path: PathBuf::from(pre_launch_exe),
            executable_args: get(args, 14),
            working_directory: parse_optional_path(args, 15),
            environment: parse_environment_or_empty(args, 16),
            stdout_path: parse_optional_path(args, 17),
            stderr_path: parse_optional_path(args, 18),
            timeout_seconds: parse_u64_or(args, 19, DEFAULT_PRE_LAUNCH_TIMEOUT_SECONDS),
            retry_attempts: parse_u32_or(args, 20, 0),
            ignore_failure: parse_bool_or(args, 21, false),
        })
    };

    Some(ServiceDefinition {
        service_name: get(args, 22),
        executable_path: PathBuf::from(executable_path_raw),
        executable_args: get(args, 2),
        working_directory: parse_optional_path(args, 3),
        priority: Priority::parse_or_default(&get(args, 4)),
        stdout_path: parse_optional_path(args, 5),
        stderr_path: parse_optional_path(args, 6),
        rotation_size_bytes: parse_u64_or(args, 7, DEFAULT_ROTATION_SIZE_BYTES),
        heartbeat_interval_seconds: parse_u64_or(
            args,
            8,
            DEFAULT_HEARTBEAT_INTERVAL_SECONDS,
        ),
        max_failed_checks: parse_u32_or(args, 9, DEFAULT_MAX_FAILED_CHECKS),
        recovery_action: RecoveryAction::parse_or_default(&get(args, 10)),
        max_restart_attempts: parse_u32_or(args, 11, DEFAULT_MAX_RESTART_ATTEMPTS),
        environment: parse_environment_or_empty(args, 12),
        dependencies: Vec::new(),
        run_as_local_system: true,
        user_account: None,
        password: None,
        pre_launch,
    })
}

/// Re-encode a [`ServiceDefinition`] into the positional argument vector
/// `decode_args` can parse back. Used by the round-trip property test (§8)
/// and by the restart helper when re-invoking the supervisor.
pub fn encode_args(def: &ServiceDefinition) -> Vec<String> {
    fn quote(s: &str) -> String {
        if s.is_empty() {
            EMPTY_SENTINEL.to_string()
        } else {
            s.to_string()
        }
    }
    fn quote_path(p: &Option<PathBuf>) -> String {
        match p {
            Some(p) => quote(&p.display().to_string()),
            None => EMPTY_SENTINEL.to_string(),
        }
    }

    let mut out = vec![
        quote("servy"),
        quote(&def.executable_path.display().to_string()),
        quote(&def.executable_args),
        quote_path(&def.working_directory),
        quote(def.priority.as_str()),
        quote_path(&def.stdout_path),
        quote_path(&def.stderr_path),
        quote(&def.rotation_size_bytes.to_string()),
        quote(&def.heartbeat_interval_seconds.to_string()),
        quote(&def.max_failed_checks.to_string()),
        quote(def.recovery_action.as_str()),
        quote(&def.max_restart_attempts.to_string()),
        quote(&crate::env::encode_environment(&def.environment)),
    ];

    match &def.pre_launch {
        Some(pl) => {
            out.push(quote(&pl.executable_path.display().to_string()));
            out.push(quote(&pl.executable_args));
            out.push(quote_path(&pl.working_directory));
            out.push(quote(&crate::env::encode_environment(&pl.environment)));
            out.push(quote_path(&pl.stdout_path));
            out.push(quote_path(&pl.stderr_path));
            out.push(quote(&pl.timeout_seconds.to_string()));
            out.push(quote(&pl.retry_attempts.to_string()));
            out.push(quote(if pl.ignore_failure { "true" } else { "false" }));
        }
        None => {
            for _ in 0..9 {
                out.push(EMPTY_SENTINEL.to_string());
            }
        }
    }

    out.push(quote(&def.service_name));
    out
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
