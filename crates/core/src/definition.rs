// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The service definition data model: the typed, immutable record a
//! supervisor instance is built from.

use std::path::PathBuf;

/// OS scheduling priority class for the launched target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Idle,
    BelowNormal,
    #[default]
    Normal,
    AboveNormal,
    High,
    RealTime,
}

impl Priority {
    /// Case-insensitive parse with fallback to [`Priority::Normal`] on anything
    /// unrecognized, per the argument decoder's "numeric/enum positions that
    /// fail to parse take defaults" rule.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Priority::Idle,
            "belownormal" => Priority::BelowNormal,
            "normal" => Priority::Normal,
            "abovenormal" => Priority::AboveNormal,
            "high" => Priority::High,
            "realtime" => Priority::RealTime,
            _ => Priority::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Idle => "Idle",
            Priority::BelowNormal => "BelowNormal",
            Priority::Normal => "Normal",
            Priority::AboveNormal => "AboveNormal",
            Priority::High => "High",
            Priority::RealTime => "RealTime",
        }
    }
}

/// The configured response to a health check that has exhausted its failure
/// budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryAction {
    #[default]
    None,
    RestartProcess,
    RestartService,
    RestartComputer,
}

impl RecoveryAction {
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => RecoveryAction::None,
            "restartprocess" => RecoveryAction::RestartProcess,
            "restartservice" => RecoveryAction::RestartService,
            "restartcomputer" => RecoveryAction::RestartComputer,
            _ => RecoveryAction::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryAction::None => "None",
            RecoveryAction::RestartProcess => "RestartProcess",
            RecoveryAction::RestartService => "RestartService",
            RecoveryAction::RestartComputer => "RestartComputer",
        }
    }
}

/// Default rotation size: 10 MiB.
pub const DEFAULT_ROTATION_SIZE_BYTES: u64 = 10 * 1024 * 1024;
/// Minimum effective rotation size once rotation is enabled: 1 MiB.
pub const MIN_ROTATION_SIZE_BYTES: u64 = 1024 * 1024;
/// Default heartbeat interval: 30 seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECONDS: u64 = 30;
/// Default failed-check budget before a recovery is dispatched.
pub const DEFAULT_MAX_FAILED_CHECKS: u32 = 3;
/// Default restart budget.
pub const DEFAULT_MAX_RESTART_ATTEMPTS: u32 = 3;
/// Default pre-launch timeout: 30 seconds.
pub const DEFAULT_PRE_LAUNCH_TIMEOUT_SECONDS: u64 = 30;

/// The auxiliary process run before the main target, mirroring the main
/// definition's executable/args/working-directory/environment/stream shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreLaunchDef {
    pub executable_path: PathBuf,
    pub executable_args: String,
    pub working_directory: Option<PathBuf>,
    pub environment: Vec<(String, String)>,
    pub stdout_path: Option<PathBuf>,
    pub stderr_path: Option<PathBuf>,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub ignore_failure: bool,
}

impl Default for PreLaunchDef {
    fn default() -> Self {
        Self {
            executable_path: PathBuf::new(),
            executable_args: String::new(),
            working_directory: None,
            environment: Vec::new(),
            stdout_path: None,
            stderr_path: None,
            timeout_seconds: DEFAULT_PRE_LAUNCH_TIMEOUT_SECONDS,
            retry_attempts: 0,
            ignore_failure: false,
        }
    }
}

/// The immutable, decoded configuration for one supervisor instance.
///
/// Constructed once by [`crate::decode_args`] and never mutated for the
/// lifetime of the process (§3 invariant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub service_name: String,
    pub executable_path: PathBuf,
    pub executable_args: String,
    pub working_directory: Option<PathBuf>,
    pub priority: Priority,
    pub stdout_path: Option<PathBuf>,
    pub stderr_path: Option<PathBuf>,
    pub rotation_size_bytes: u64,
    pub heartbeat_interval_seconds: u64,
    pub max_failed_checks: u32,
    pub recovery_action: RecoveryAction,
    pub max_restart_attempts: u32,
    pub environment: Vec<(String, String)>,
    pub dependencies: Vec<String>,
    pub run_as_local_system: bool,
    pub user_account: Option<String>,
    pub password: Option<String>,
    pub pre_launch: Option<PreLaunchDef>,
}

impl ServiceDefinition {
    /// Whether the health monitor should be constructed for this definition
    /// (§3 invariant: all three gating conditions must hold).
    pub fn health_monitoring_enabled(&self) -> bool {
        self.recovery_action != RecoveryAction::None
            && self.heartbeat_interval_seconds != 0
            && self.max_failed_checks != 0
    }

    /// The effective rotation size: 0 disables rotation; otherwise clamped to
    /// the documented 1 MiB minimum.
    pub fn effective_rotation_size_bytes(&self) -> u64 {
        if self.rotation_size_bytes == 0 {
            0
        } else {
            self.rotation_size_bytes.max(MIN_ROTATION_SIZE_BYTES)
        }
    }

    /// Whether stdout and stderr are configured to the same physical path,
    /// in which case they must share one writer rather than rotate
    /// independently (§3 invariant).
    pub fn shares_stdout_stderr_sink(&self) -> bool {
        match (&self.stdout_path, &self.stderr_path) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
