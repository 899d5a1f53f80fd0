// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced while decoding and validating a [`crate::ServiceDefinition`].

use thiserror::Error;

/// Errors that fail service start before a target process is ever launched.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("invalid environment syntax: {0}")]
    InvalidEnvironment(String),
    #[error("duplicate environment key: {0}")]
    DuplicateEnvironmentKey(String),
}
