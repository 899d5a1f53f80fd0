// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("process recovery dispatch failed: {0}")]
    ProcessRecovery(#[from] servy_process::ProcessError),

    #[error("restart helper launch failed: {0}")]
    HelperLaunchFailed(String),

    #[error("service self-restart request failed: {0}")]
    ServiceRestartFailed(String),

    #[error("computer restart request failed: {0}")]
    ComputerRestartFailed(String),
}
