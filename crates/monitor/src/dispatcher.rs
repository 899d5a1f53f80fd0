// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The recovery-action capability interface the monitor dispatches through
//! (§4.7 step 6, §9 "recovery action as enum-plus-switch").

use crate::error::MonitorError;
use async_trait::async_trait;

/// Executes one of the three non-`None` recovery actions. Implementations
/// own whatever state is needed to carry the action out (the child
/// container for `RestartProcess`, the restart-helper launcher for
/// `RestartService`, the OS shutdown invocation for `RestartComputer`).
#[async_trait]
pub trait RecoveryDispatcher: Send + Sync + 'static {
    async fn restart_process(&self) -> Result<(), MonitorError>;
    async fn restart_service(&self) -> Result<(), MonitorError>;
    async fn restart_computer(&self) -> Result<(), MonitorError>;
}
