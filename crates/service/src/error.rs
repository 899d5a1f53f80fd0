// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lifecycle controller's aggregated error type (§7).

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("process error: {0}")]
    Process(#[from] servy_process::ProcessError),

    #[error("log sink error: {0}")]
    LogSink(#[from] servy_logging::LogSinkError),

    #[error("could not determine a machine-bound state directory")]
    NoStateDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
