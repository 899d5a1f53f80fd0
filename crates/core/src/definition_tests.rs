// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn base_def() -> ServiceDefinition {
    ServiceDefinition {
        service_name: "svc".to_string(),
        executable_path: PathBuf::from("/abs/app.exe"),
        executable_args: String::new(),
        working_directory: None,
        priority: Priority::Normal,
        stdout_path: None,
        stderr_path: None,
        rotation_size_bytes: DEFAULT_ROTATION_SIZE_BYTES,
        heartbeat_interval_seconds: DEFAULT_HEARTBEAT_INTERVAL_SECONDS,
        max_failed_checks: DEFAULT_MAX_FAILED_CHECKS,
        recovery_action: RecoveryAction::RestartProcess,
        max_restart_attempts: DEFAULT_MAX_RESTART_ATTEMPTS,
        environment: Vec::new(),
        dependencies: Vec::new(),
        run_as_local_system: true,
        user_account: None,
        password: None,
        pre_launch: None,
    }
}

#[yare::parameterized(
    upper = { "HIGH", Priority::High },
    lower_mixed = { "realtime", Priority::RealTime },
    unrecognized = { "bogus", Priority::Normal },
)]
fn priority_parses_case_insensitively(raw: &str, expected: Priority) {
    assert_eq!(Priority::parse_or_default(raw), expected);
}

#[yare::parameterized(
    lower = { "restartprocess", RecoveryAction::RestartProcess },
    upper = { "RESTARTCOMPUTER", RecoveryAction::RestartComputer },
    unrecognized = { "???", RecoveryAction::None },
)]
fn recovery_action_parses_case_insensitively(raw: &str, expected: RecoveryAction) {
    assert_eq!(RecoveryAction::parse_or_default(raw), expected);
}

#[test]
fn health_monitor_disabled_when_recovery_action_none() {
    let mut def = base_def();
    def.recovery_action = RecoveryAction::None;
    assert!(!def.health_monitoring_enabled());
}

#[test]
fn health_monitor_disabled_when_heartbeat_zero() {
    let mut def = base_def();
    def.heartbeat_interval_seconds = 0;
    assert!(!def.health_monitoring_enabled());
}

#[test]
fn health_monitor_disabled_when_max_failed_checks_zero() {
    let mut def = base_def();
    def.max_failed_checks = 0;
    assert!(!def.health_monitoring_enabled());
}

#[test]
fn health_monitor_enabled_when_all_three_gates_hold() {
    assert!(base_def().health_monitoring_enabled());
}

#[test]
fn rotation_disabled_when_zero() {
    let mut def = base_def();
    def.rotation_size_bytes = 0;
    assert_eq!(def.effective_rotation_size_bytes(), 0);
}

#[test]
fn rotation_clamped_to_minimum() {
    let mut def = base_def();
    def.rotation_size_bytes = 100;
    assert_eq!(def.effective_rotation_size_bytes(), MIN_ROTATION_SIZE_BYTES);
}

#[test]
fn rotation_above_minimum_is_unchanged() {
    let mut def = base_def();
    def.rotation_size_bytes = MIN_ROTATION_SIZE_BYTES * 4;
    assert_eq!(
        def.effective_rotation_size_bytes(),
        MIN_ROTATION_SIZE_BYTES * 4
    );
}

#[test]
fn shares_sink_only_when_paths_equal() {
    let mut def = base_def();
    def.stdout_path = Some(PathBuf::from("/tmp/o.log"));
    def.stderr_path = Some(PathBuf::from("/tmp/o.log"));
    assert!(def.shares_stdout_stderr_sink());

    def.stderr_path = Some(PathBuf::from("/tmp/e.log"));
    assert!(!def.shares_stdout_stderr_sink());
}
