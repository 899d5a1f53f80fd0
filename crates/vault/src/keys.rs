// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Machine-bound key material for the credential vault.
//!
//! `(key, iv)` is persisted on disk once per machine and lazily loaded once
//! per process (§3). The key doubles as the v2 encryption key (a fresh IV is
//! drawn per encryption); the iv is the static initialization vector used
//! only by the legacy v1 reader.

use crate::error::VaultError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;

/// The `(key, iv)` pair backing vault encryption and v1 decryption.
#[derive(Clone)]
pub struct CredentialVaultKeys {
    pub key: [u8; KEY_LEN],
    pub iv: [u8; IV_LEN],
}

impl std::fmt::Debug for CredentialVaultKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVaultKeys").finish_non_exhaustive()
    }
}

impl Drop for CredentialVaultKeys {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.key.zeroize();
        self.iv.zeroize();
    }
}

static CACHED: OnceLock<CredentialVaultKeys> = OnceLock::new();

/// Default machine-bound key file location: `<state_dir>/vault.key`.
fn default_key_path() -> Result<PathBuf, VaultError> {
    let base = dirs::data_dir()
        .or_else(dirs::config_dir)
        .ok_or_else(|| VaultError::KeyUnavailable("no machine-bound state directory".to_string()))?;
    Ok(base.join("servy").join("vault.key"))
}

impl CredentialVaultKeys {
    /// Load the process-wide key pair, generating and persisting one on
    /// first use. Subsequent calls within the same process return the
    /// cached value (lazily loaded once per process, §3).
    pub fn load() -> Result<CredentialVaultKeys, VaultError> {
        if let Some(existing) = CACHED.get() {
            return Ok(existing.clone());
        }
        let path = default_key_path()?;
        let keys = load_or_create(&path)?;
        Ok(CACHED.get_or_init(|| keys).clone())
    }

    /// Load (or create) the key pair at an explicit path, bypassing the
    /// process-wide cache. Used by tests that need an isolated key file.
    pub fn load_from(path: &Path) -> Result<CredentialVaultKeys, VaultError> {
        load_or_create(path)
    }
}

fn load_or_create(path: &Path) -> Result<CredentialVaultKeys, VaultError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_key_file(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let keys = generate();
            persist(path, &keys)?;
            Ok(keys)
        }
        Err(e) => Err(VaultError::Io(e)),
    }
}

fn generate() -> CredentialVaultKeys {
    use rand::RngCore;
    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut key);
    rand::rng().fill_bytes(&mut iv);
    CredentialVaultKeys { key, iv }
}

fn persist(path: &Path, keys: &CredentialVaultKeys) -> Result<(), VaultError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = format!(
        "{}\n{}\n",
        BASE64.encode(keys.key),
        BASE64.encode(keys.iv)
    );
    std::fs::write(path, contents)?;
    restrict_permissions(path);
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = std::fs::metadata(path) {
        let mut perms = metadata.permissions();
        perms.set_mode(0o600);
        let _ = std::fs::set_permissions(path, perms);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {
    // On Windows the ACL should restrict access to the service account and
    // administrators; that is configured at install time, outside the core.
}

fn parse_key_file(contents: &str) -> Result<CredentialVaultKeys, VaultError> {
    let mut lines = contents.lines();
    let key_line = lines
        .next()
        .ok_or_else(|| VaultError::MalformedBlob("key file missing key line".to_string()))?;
    let iv_line = lines
        .next()
        .ok_or_else(|| VaultError::MalformedBlob("key file missing iv line".to_string()))?;

    let key_bytes = BASE64
        .decode(key_line)
        .map_err(|e| VaultError::MalformedBlob(e.to_string()))?;
    let iv_bytes = BASE64
        .decode(iv_line)
        .map_err(|e| VaultError::MalformedBlob(e.to_string()))?;

    let key: [u8; KEY_LEN] = key_bytes
        .try_into()
        .map_err(|_| VaultError::MalformedBlob("key has wrong length".to_string()))?;
    let iv: [u8; IV_LEN] = iv_bytes
        .try_into()
        .map_err(|_| VaultError::MalformedBlob("iv has wrong length".to_string()))?;

    Ok(CredentialVaultKeys { key, iv })
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
