// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pre-launch stage runner (C6, §4.6): a timeboxed, retriable auxiliary
//! process executed before the main target.

use crate::env::layer_environment;
use crate::error::ProcessError;
use crate::launcher::{LaunchSpec, ProcessLauncher};
use servy_core::PreLaunchDef;
use std::time::Duration;

/// Runs `def` per the §4.6 algorithm: up to `def.retry_attempts + 1` attempts,
/// each timeboxed to `def.timeout_seconds`, no containment group attached.
/// Returns `Ok(())` on the first zero-exit attempt, or on exhaustion when
/// `def.ignore_failure` is set (logging a warning); otherwise the final
/// failure.
pub async fn run_pre_launch(
    def: &PreLaunchDef,
    launcher: &dyn ProcessLauncher,
    ambient_env: &[(String, String)],
) -> Result<(), ProcessError> {
    let environment = layer_environment(ambient_env, &def.environment);
    let working_directory = def
        .working_directory
        .clone()
        .unwrap_or_else(|| def.executable_path.parent().map(|p| p.to_path_buf()).unwrap_or_default());

    let mut attempts = 0u32;
    for attempt in 0..=def.retry_attempts {
        attempts = attempt + 1;

        let spec = LaunchSpec {
            executable_path: def.executable_path.clone(),
            executable_args: def.executable_args.clone(),
            working_directory: working_directory.clone(),
            environment: environment.clone(),
            priority: servy_core::Priority::Normal,
            stdout_sink: None,
            stderr_sink: None,
        };

        let process = match launcher.launch(spec, None).await {
            Ok(process) => process,
            Err(err) => {
                tracing::warn!(attempt, error = %err, "pre-launch attempt failed to start");
                continue;
            }
        };

        let timeout = Duration::from_secs(def.timeout_seconds);
        match tokio::time::timeout(timeout, process.wait()).await {
            Ok(Ok(0)) => return Ok(()),
            Ok(Ok(code)) => {
                tracing::warn!(attempt, exit_code = code, "pre-launch attempt exited non-zero");
            }
            Ok(Err(err)) => {
                tracing::warn!(attempt, error = %err, "pre-launch attempt failed while waiting");
            }
            Err(_) => {
                tracing::warn!(attempt, "pre-launch attempt timed out");
                let _ = process.shutdown(Duration::from_secs(5)).await;
            }
        }
    }

    if def.ignore_failure {
        tracing::warn!(attempts, "pre-launch failed on all attempts; ignoring per configuration");
        Ok(())
    } else {
        Err(ProcessError::PreLaunchFailed { attempts })
    }
}

#[cfg(test)]
#[path = "prelaunch_tests.rs"]
mod tests;
