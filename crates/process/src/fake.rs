// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`ProcessLauncher`]/[`RunningProcess`] fakes for testing the
//! monitor and lifecycle layers without spawning real OS processes.
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::ProcessError;
use crate::group::ContainmentGroup;
use crate::launcher::{LaunchSpec, ProcessLauncher, RunningProcess};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct FakeState {
    exited: bool,
    exit_code: i32,
    shutdown_calls: u32,
}

/// A process double whose liveness is driven entirely by test code via
/// [`FakeRunningProcess::mark_exited`].
pub struct FakeRunningProcess {
    pid: u32,
    state: Mutex<FakeState>,
}

impl FakeRunningProcess {
    pub fn new(pid: u32) -> Arc<Self> {
        Arc::new(Self {
            pid,
            state: Mutex::new(FakeState {
                exited: false,
                exit_code: 0,
                shutdown_calls: 0,
            }),
        })
    }

    pub fn mark_exited(&self, code: i32) {
        let mut state = self.state.lock();
        state.exited = true;
        state.exit_code = code;
    }

    pub fn shutdown_calls(&self) -> u32 {
        self.state.lock().shutdown_calls
    }
}

#[async_trait]
impl RunningProcess for FakeRunningProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    async fn has_exited(&self) -> bool {
        self.state.lock().exited
    }

    async fn wait(&self) -> Result<i32, ProcessError> {
        loop {
            {
                let state = self.state.lock();
                if state.exited {
                    return Ok(state.exit_code);
                }
            }
            tokio::task::yield_now().await;
        }
    }

    async fn shutdown(&self, _timeout: Duration) -> Result<(), ProcessError> {
        let mut state = self.state.lock();
        state.shutdown_calls += 1;
        state.exited = true;
        Ok(())
    }
}

/// One recorded [`FakeProcessLauncher::launch`] invocation.
#[derive(Debug, Clone)]
pub struct LaunchCall {
    pub executable_path: std::path::PathBuf,
    pub executable_args: String,
    pub working_directory: std::path::PathBuf,
    pub containment_attached: bool,
}

/// Records every launch and hands back a [`FakeRunningProcess`] the test
/// controls directly.
#[derive(Default)]
pub struct FakeProcessLauncher {
    calls: Mutex<Vec<LaunchCall>>,
    next_pid: AtomicU32,
    processes: Mutex<Vec<Arc<FakeRunningProcess>>>,
}

impl FakeProcessLauncher {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_pid: AtomicU32::new(1000),
            processes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<LaunchCall> {
        self.calls.lock().clone()
    }

    /// The most recently launched fake process, for the test to drive.
    pub fn last_process(&self) -> Option<Arc<FakeRunningProcess>> {
        self.processes.lock().last().cloned()
    }

    pub fn launch_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ProcessLauncher for FakeProcessLauncher {
    async fn launch(
        &self,
        spec: LaunchSpec,
        containment: Option<Arc<dyn ContainmentGroup>>,
    ) -> Result<Arc<dyn RunningProcess>, ProcessError> {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let containment_attached = if let Some(group) = &containment {
            group.assign(pid).is_ok()
        } else {
            false
        };

        self.calls.lock().push(LaunchCall {
            executable_path: spec.executable_path,
            executable_args: spec.executable_args,
            working_directory: spec.working_directory,
            containment_attached,
        });

        let process = FakeRunningProcess::new(pid);
        self.processes.lock().push(Arc::clone(&process));
        Ok(process)
    }
}
