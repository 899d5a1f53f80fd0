// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-tick state machine (§4.7). `tick` holds a single lock across the
//! entire body, including the recovery dispatch, so ticks are strictly
//! serial and never race a concurrent disposal.

use crate::dispatcher::RecoveryDispatcher;
use servy_core::RecoveryAction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// `{failed_checks, restart_attempts, recovering}` (§3).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatState {
    pub failed_checks: u32,
    pub restart_attempts: u32,
    pub recovering: bool,
}

pub struct HealthMonitor {
    state: tokio::sync::Mutex<HeartbeatState>,
    max_failed_checks: u32,
    max_restart_attempts: u32,
    recovery_action: RecoveryAction,
    dispatcher: Arc<dyn RecoveryDispatcher>,
    disposed: AtomicBool,
}

impl HealthMonitor {
    pub fn new(
        max_failed_checks: u32,
        max_restart_attempts: u32,
        recovery_action: RecoveryAction,
        dispatcher: Arc<dyn RecoveryDispatcher>,
    ) -> Self {
        Self {
            state: tokio::sync::Mutex::new(HeartbeatState::default()),
            max_failed_checks,
            max_restart_attempts,
            recovery_action,
            dispatcher,
            disposed: AtomicBool::new(false),
        }
    }

    pub async fn snapshot(&self) -> HeartbeatState {
        *self.state.lock().await
    }

    /// Marks the monitor disposed; subsequent ticks are no-ops (§4.7 step 1).
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    /// Runs one heartbeat tick. `target_alive` is the caller's liveness
    /// probe (`has_exited == false` in spec terms).
    pub async fn tick(&self, target_alive: bool) -> HeartbeatState {
        if self.disposed.load(Ordering::SeqCst) {
            return self.snapshot().await;
        }

        let mut state = self.state.lock().await;

        if state.recovering {
            return *state;
        }

        if target_alive {
            if state.failed_checks > 0 {
                tracing::info!("target recovered; resetting failure and restart counters");
                state.failed_checks = 0;
                state.restart_attempts = 0;
            }
            return *state;
        }

        state.failed_checks += 1;
        if state.failed_checks < self.max_failed_checks {
            return *state;
        }

        if state.restart_attempts >= self.max_restart_attempts {
            tracing::error!("max restart attempts reached; monitor is idling");
            state.recovering = false;
            return *state;
        }

        state.restart_attempts += 1;
        state.recovering = true;
        state.failed_checks = 0;

        let dispatch_result = match self.recovery_action {
            RecoveryAction::None => Ok(()),
            RecoveryAction::RestartProcess => self.dispatcher.restart_process().await,
            RecoveryAction::RestartService => self.dispatcher.restart_service().await,
            RecoveryAction::RestartComputer => self.dispatcher.restart_computer().await,
        };

        if let Err(err) = dispatch_result {
            tracing::error!(error = %err, "recovery dispatch failed");
        }

        state.recovering = false;
        *state
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
