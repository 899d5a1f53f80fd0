// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launches a target process, redirects its streams into [`servy_logging::LogSink`],
//! and attaches it to a containment group before the first byte is drained
//! (§4.5).

use crate::args::split_args;
use crate::error::ProcessError;
use crate::group::ContainmentGroup;
use async_trait::async_trait;
use servy_core::Priority;
use servy_logging::LogSink;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Everything needed to launch one process, main target or pre-launch aux.
#[derive(Clone)]
pub struct LaunchSpec {
    pub executable_path: PathBuf,
    pub executable_args: String,
    pub working_directory: PathBuf,
    pub environment: Vec<(String, String)>,
    pub priority: Priority,
    pub stdout_sink: Option<Arc<LogSink>>,
    pub stderr_sink: Option<Arc<LogSink>>,
}

/// A started, observable process.
#[async_trait]
pub trait RunningProcess: Send + Sync {
    fn pid(&self) -> u32;

    /// Non-blocking liveness check.
    async fn has_exited(&self) -> bool;

    /// Block until the process exits, returning its exit code.
    async fn wait(&self) -> Result<i32, ProcessError>;

    /// Graceful-then-forced shutdown within `timeout` (§4.5 shutdown contract).
    /// A supervised Windows service target has no main window of its own to
    /// close gracefully, so this goes straight to a forced terminate and
    /// waits for exit.
    async fn shutdown(&self, timeout: Duration) -> Result<(), ProcessError>;
}

/// Spawns real OS processes via `tokio::process`.
#[async_trait]
pub trait ProcessLauncher: Send + Sync + 'static {
    async fn launch(
        &self,
        spec: LaunchSpec,
        containment: Option<Arc<dyn ContainmentGroup>>,
    ) -> Result<Arc<dyn RunningProcess>, ProcessError>;
}

#[derive(Default)]
pub struct OsProcessLauncher;

#[async_trait]
impl ProcessLauncher for OsProcessLauncher {
    async fn launch(
        &self,
        spec: LaunchSpec,
        containment: Option<Arc<dyn ContainmentGroup>>,
    ) -> Result<Arc<dyn RunningProcess>, ProcessError> {
        do_launch(spec, containment).await
    }
}

async fn do_launch(
    spec: LaunchSpec,
    containment: Option<Arc<dyn ContainmentGroup>>,
) -> Result<Arc<dyn RunningProcess>, ProcessError> {
    let mut cmd = Command::new(&spec.executable_path);
    cmd.args(split_args(&spec.executable_args))
        .current_dir(&spec.working_directory)
        .env_clear()
        .envs(spec.environment.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        path: spec.executable_path.clone(),
        source,
    })?;

    let pid = child.id().unwrap_or(0);

    if let Some(group) = &containment {
        if let Err(err) = group.assign(pid) {
            let _ = child.start_kill();
            let _ = child.wait().await;
            return Err(err);
        }
    }

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_task = stdout.map(|pipe| {
        tokio::spawn(drain(pipe, spec.stdout_sink.clone(), "stdout"))
    });
    let stderr_task = stderr.map(|pipe| {
        tokio::spawn(drain(pipe, spec.stderr_sink.clone(), "stderr"))
    });

    set_priority(&child, spec.priority);

    Ok(Arc::new(OsRunningProcess {
        pid,
        child: tokio::sync::Mutex::new(child),
        stdout_task: parking_lot::Mutex::new(stdout_task),
        stderr_task: parking_lot::Mutex::new(stderr_task),
    }))
}

async fn drain<R>(pipe: R, sink: Option<Arc<LogSink>>, stream_name: &'static str)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(pipe).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(sink) = &sink {
                    if let Err(err) = sink.write_line(&line) {
                        tracing::warn!(stream = stream_name, error = %err, "failed to write drained line to log sink");
                    }
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(stream = stream_name, error = %err, "broken pipe while draining child output");
                break;
            }
        }
    }
}

#[cfg(windows)]
fn set_priority(child: &tokio::process::Child, priority: Priority) {
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::System::Threading::{
        SetPriorityClass, ABOVE_NORMAL_PRIORITY_CLASS, BELOW_NORMAL_PRIORITY_CLASS,
        HIGH_PRIORITY_CLASS, IDLE_PRIORITY_CLASS, NORMAL_PRIORITY_CLASS, PROCESS_CREATION_FLAGS,
        REALTIME_PRIORITY_CLASS,
    };

    let Some(raw_handle) = child.raw_handle() else {
        return;
    };

    let class: PROCESS_CREATION_FLAGS = match priority {
        Priority::Idle => IDLE_PRIORITY_CLASS,
        Priority::BelowNormal => BELOW_NORMAL_PRIORITY_CLASS,
        Priority::Normal => NORMAL_PRIORITY_CLASS,
        Priority::AboveNormal => ABOVE_NORMAL_PRIORITY_CLASS,
        Priority::High => HIGH_PRIORITY_CLASS,
        Priority::RealTime => REALTIME_PRIORITY_CLASS,
    };

    // SAFETY: `raw_handle` is the live handle tokio just returned for this
    // child; it remains valid for the duration of this call.
    let result = unsafe { SetPriorityClass(HANDLE(raw_handle as isize), class) };
    if result.is_err() {
        tracing::warn!(?priority, "failed to set child process priority class");
    }
}

#[cfg(not(windows))]
fn set_priority(_child: &tokio::process::Child, _priority: Priority) {
    tracing::debug!("priority class is not configurable on this platform");
}

struct OsRunningProcess {
    pid: u32,
    child: tokio::sync::Mutex<tokio::process::Child>,
    stdout_task: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
    stderr_task: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

#[async_trait]
impl RunningProcess for OsRunningProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    async fn has_exited(&self) -> bool {
        let mut child = self.child.lock().await;
        matches!(child.try_wait(), Ok(Some(_)))
    }

    async fn wait(&self) -> Result<i32, ProcessError> {
        let mut child = self.child.lock().await;
        let status = child.wait().await?;
        Ok(status.code().unwrap_or(-1))
    }

    async fn shutdown(&self, timeout: Duration) -> Result<(), ProcessError> {
        let mut child = self.child.lock().await;
        if matches!(child.try_wait(), Ok(Some(_))) {
            return Ok(());
        }

        child.start_kill()?;
        let outcome = tokio::time::timeout(timeout, child.wait()).await;
        drop(child);

        if let Some(task) = self.stdout_task.lock().take() {
            task.abort();
        }
        if let Some(task) = self.stderr_task.lock().take() {
            task.abort();
        }

        match outcome {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(source)) => Err(ProcessError::Io(source)),
            Err(_) => Err(ProcessError::ShutdownTimedOut),
        }
    }
}
