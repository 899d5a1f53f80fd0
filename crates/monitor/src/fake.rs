// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`RecoveryDispatcher`] for testing the monitor in isolation.
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::dispatcher::RecoveryDispatcher;
use crate::error::MonitorError;
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchCall {
    RestartProcess,
    RestartService,
    RestartComputer,
}

#[derive(Default)]
pub struct RecordingDispatcher {
    calls: Mutex<Vec<DispatchCall>>,
    fail_next: Mutex<bool>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().clone()
    }

    pub fn fail_next_dispatch(&self) {
        *self.fail_next.lock() = true;
    }

    fn record(&self, call: DispatchCall) -> Result<(), MonitorError> {
        self.calls.lock().push(call);
        let mut fail = self.fail_next.lock();
        if *fail {
            *fail = false;
            Err(MonitorError::HelperLaunchFailed("forced test failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecoveryDispatcher for RecordingDispatcher {
    async fn restart_process(&self) -> Result<(), MonitorError> {
        self.record(DispatchCall::RestartProcess)
    }

    async fn restart_service(&self) -> Result<(), MonitorError> {
        self.record(DispatchCall::RestartService)
    }

    async fn restart_computer(&self) -> Result<(), MonitorError> {
        self.record(DispatchCall::RestartComputer)
    }
}
