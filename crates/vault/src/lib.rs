// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! servy-vault: credential vault primitives (C2).
//!
//! Stores per-service passwords encrypted with a machine-bound symmetric
//! key. Two formats are readable (§4.2): a legacy v1 format (static IV, no
//! authentication) and the current v2 format (random IV, HMAC-SHA256
//! authenticated). New writes always produce v2.

mod codec;
mod error;
mod keys;

pub use codec::{decrypt, encrypt, V2_MARKER};
pub use error::VaultError;
pub use keys::CredentialVaultKeys;
