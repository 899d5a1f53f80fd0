// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to attach pid {pid} to containment group: {source}")]
    ContainmentAttach {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("containment group release failed: {source}")]
    ContainmentRelease {
        #[source]
        source: std::io::Error,
    },

    #[error("process did not exit within the shutdown timeout")]
    ShutdownTimedOut,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pre-launch failed after {attempts} attempt(s)")]
    PreLaunchFailed { attempts: u32 },
}
