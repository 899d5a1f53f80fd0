// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lifecycle controller (C8, §4.8): `OnStart`/`OnStop` glue owning all of
//! the rotating log writer, child container, pre-launch runner, and health
//! monitor.

use crate::dispatcher::ServiceRecoveryDispatcher;
use crate::error::LifecycleError;
use crate::restart_helper::locate_restart_helper;
use async_trait::async_trait;
use parking_lot::Mutex;
use servy_core::{decode_args, validate_exists, PathKind, ServiceDefinition};
use servy_logging::LogSink;
use servy_monitor::{HealthMonitor, HeartbeatTimer, LivenessProbe};
use servy_process::{layer_environment, run_pre_launch, ChildContainer, LaunchSpec, ProcessLauncher, RunningProcess};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

struct RunningState {
    stdout_sink: Option<Arc<LogSink>>,
    stderr_sink: Option<Arc<LogSink>>,
    current_child: Arc<Mutex<Option<Arc<dyn RunningProcess>>>>,
    timer: Option<HeartbeatTimer>,
    monitor: Option<Arc<HealthMonitor>>,
}

/// Entry point for the OS service manager: decodes the argument vector,
/// brings the target up, and tears it down again on request.
pub struct LifecycleController {
    launcher: Arc<dyn ProcessLauncher>,
    container: Arc<ChildContainer>,
    state: Mutex<Option<RunningState>>,
}

impl LifecycleController {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            container: Arc::new(ChildContainer::new(launcher.clone())),
            launcher,
            state: Mutex::new(None),
        }
    }

    /// Decodes `args`, brings the target (and, if configured, pre-launch and
    /// health monitoring) up. On any failure in steps 3-6 the already-opened
    /// resources are torn down and the error is returned so the caller can
    /// signal the service manager to stop (§4.8).
    pub async fn on_start(&self, args: &[String]) -> Result<(), LifecycleError> {
        let Some(definition) = decode_args(args) else {
            return Err(LifecycleError::Configuration(
                "empty executable path in argument vector".to_string(),
            ));
        };

        let working_directory = resolve_working_directory(&definition);

        match self.bring_up(&definition, working_directory).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::error!(error = %err, "OnStart failed; tearing down and signalling stop");
                self.on_stop().await;
                Err(err)
            }
        }
    }

    async fn bring_up(
        &self,
        definition: &ServiceDefinition,
        working_directory: PathBuf,
    ) -> Result<(), LifecycleError> {
        let rotation = definition.effective_rotation_size_bytes();

        let stdout_sink = match &definition.stdout_path {
            Some(path) => Some(Arc::new(LogSink::open(path, rotation)?)),
            None => None,
        };
        let stderr_sink = if definition.shares_stdout_stderr_sink() {
            stdout_sink.clone()
        } else {
            match &definition.stderr_path {
                Some(path) => Some(Arc::new(LogSink::open(path, rotation)?)),
                None => None,
            }
        };

        let ambient: Vec<(String, String)> = std::env::vars().collect();

        if let Some(pre_launch) = &definition.pre_launch {
            run_pre_launch(pre_launch, self.launcher.as_ref(), &ambient).await?;
        }

        let environment = layer_environment(&ambient, &definition.environment);
        let spec = LaunchSpec {
            executable_path: definition.executable_path.clone(),
            executable_args: definition.executable_args.clone(),
            working_directory,
            environment,
            priority: definition.priority,
            stdout_sink: stdout_sink.clone(),
            stderr_sink: stderr_sink.clone(),
        };

        let child = self.container.launch(spec.clone()).await?;
        let current_child = Arc::new(Mutex::new(Some(child)));

        let (monitor, timer) = if definition.health_monitoring_enabled() {
            let dispatcher = Arc::new(ServiceRecoveryDispatcher::new(
                Arc::clone(&self.container),
                Arc::clone(&current_child),
                spec,
                definition.service_name.clone(),
                locate_restart_helper(),
            ));
            let monitor = Arc::new(HealthMonitor::new(
                definition.max_failed_checks,
                definition.max_restart_attempts,
                definition.recovery_action,
                dispatcher,
            ));
            let probe: Arc<dyn LivenessProbe> = Arc::new(ChildLivenessProbe(Arc::clone(&current_child)));
            let timer = HeartbeatTimer::start(
                Arc::clone(&monitor),
                Duration::from_secs(definition.heartbeat_interval_seconds),
                probe,
            );
            (Some(monitor), Some(timer))
        } else {
            (None, None)
        };

        *self.state.lock() = Some(RunningState {
            stdout_sink,
            stderr_sink,
            current_child,
            timer,
            monitor,
        });

        Ok(())
    }

    /// Teardown in the order §4.8 specifies: stop the heartbeat timer,
    /// flush and close the log sinks, gracefully-then-forcibly stop the
    /// child, then release the containment group. Idempotent: a second
    /// call observes no running state and is a no-op.
    pub async fn on_stop(&self) {
        let Some(state) = self.state.lock().take() else {
            return;
        };

        if let Some(timer) = state.timer {
            timer.stop();
        }
        if let Some(monitor) = &state.monitor {
            monitor.dispose();
        }

        for sink in [state.stdout_sink.as_ref(), state.stderr_sink.as_ref()].into_iter().flatten() {
            let _ = sink.flush();
        }
        for sink in [state.stdout_sink.as_ref(), state.stderr_sink.as_ref()].into_iter().flatten() {
            let _ = sink.close();
        }

        if let Some(child) = state.current_child.lock().take() {
            if let Err(err) = child.shutdown(Duration::from_secs(5)).await {
                tracing::warn!(error = %err, "child did not shut down cleanly during teardown");
            }
        }

        self.container.release();
    }
}

struct ChildLivenessProbe(Arc<Mutex<Option<Arc<dyn RunningProcess>>>>);

#[async_trait]
impl LivenessProbe for ChildLivenessProbe {
    async fn is_alive(&self) -> bool {
        let child = self.0.lock().clone();
        match child {
            Some(child) => !child.has_exited().await,
            None => false,
        }
    }
}

/// `working_directory` absent or invalid -> directory of `executable_path`;
/// if that is still unusable -> the OS System32 directory (§3).
fn resolve_working_directory(definition: &ServiceDefinition) -> PathBuf {
    if let Some(wd) = &definition.working_directory {
        if validate_exists(&wd.to_string_lossy(), PathKind::Directory).unwrap_or(false) {
            return wd.clone();
        }
    }

    if let Some(parent) = definition.executable_path.parent() {
        if validate_exists(&parent.to_string_lossy(), PathKind::Directory).unwrap_or(false) {
            return parent.to_path_buf();
        }
    }

    system32_directory()
}

fn system32_directory() -> PathBuf {
    if cfg!(windows) {
        std::env::var_os("SystemRoot")
            .map(|root| PathBuf::from(root).join("System32"))
            .unwrap_or_else(|| PathBuf::from(r"C:\Windows\System32"))
    } else {
        PathBuf::from("/")
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
