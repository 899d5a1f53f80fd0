// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the credential vault. The vault never returns garbage
/// on a failed v2 decrypt (§4.2) — callers get [`VaultError::CorruptedCredential`]
/// instead.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("credential is corrupted: authentication failed")]
    CorruptedCredential,
    #[error("cannot encrypt an empty credential")]
    EmptyInput,
    #[error("malformed credential blob: {0}")]
    MalformedBlob(String),
    #[error("key material unavailable: {0}")]
    KeyUnavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
