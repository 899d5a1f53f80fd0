// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-process (not target-process) configuration: where its own
//! diagnostic log and restart-helper binary live.

use crate::error::LifecycleError;
use std::path::PathBuf;

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// The supervisor's own diagnostic log location, as distinct from the
/// target's redirected stdout/stderr sinks: `<state_dir>/servy/supervisor.log`.
pub fn diagnostic_log_path() -> Result<PathBuf, LifecycleError> {
    let base = dirs::data_dir()
        .or_else(dirs::config_dir)
        .ok_or(LifecycleError::NoStateDir)?;
    Ok(base.join("servy").join("supervisor.log"))
}

/// Rotates the supervisor's own diagnostic log at startup if it has grown
/// past `MAX_LOG_SIZE`, keeping up to `MAX_ROTATED_LOGS` numbered backups.
/// This is separate from the target-stream rotation in `servy_logging`,
/// which rotates on every write rather than once at process start.
pub fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

const STARTUP_MARKER_PREFIX: &str = "--- servy: starting (pid: ";

/// Appends a startup marker to the diagnostic log before the tracing
/// subscriber is installed, so a log reader can find where the current
/// startup attempt begins even if tracing setup itself fails.
pub fn write_startup_marker(log_path: &std::path::Path) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(log_path)?;
    writeln!(file, "{}{}) ---\n", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

/// Installs the `tracing` subscriber, writing to `log_path` via a
/// non-blocking appender. Rotation of this file already happened via
/// `rotate_log_if_needed`, so the appender itself never rotates.
pub fn setup_logging(
    log_path: &std::path::Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let parent = log_path.parent().ok_or(LifecycleError::NoStateDir)?;
    let file_name = log_path.file_name().ok_or(LifecycleError::NoStateDir)?;
    std::fs::create_dir_all(parent)?;

    let file_appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
