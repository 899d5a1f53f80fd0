// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! v1/v2 credential codec (§4.2).

use crate::error::VaultError;
use crate::keys::CredentialVaultKeys;
use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Marker prefix for the current (v2) format.
pub const V2_MARKER: &str = "SERVY_ENC:v2:";
const LEGACY_PREFIX: &str = "SERVY_ENC:";
const HMAC_LEN: usize = 32;

/// Encrypt `plaintext`, always producing the v2 format. `plaintext` must not
/// be empty.
pub fn encrypt(plaintext: &str, keys: &CredentialVaultKeys) -> Result<String, VaultError> {
    if plaintext.is_empty() {
        return Err(VaultError::EmptyInput);
    }

    let mut iv = [0u8; 16];
    {
        use rand::RngCore;
        rand::rng().fill_bytes(&mut iv);
    }

    let plaintext_buf = Zeroizing::new(plaintext.as_bytes().to_vec());
    let ciphertext = Zeroizing::new(
        Aes256CbcEnc::new(&keys.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(&plaintext_buf),
    );

    let hmac_key = Zeroizing::new(Sha256::digest(keys.key).to_vec());
    let mut mac = HmacSha256::new_from_slice(&hmac_key)
        .map_err(|e| VaultError::KeyUnavailable(e.to_string()))?;
    mac.update(&iv);
    mac.update(&ciphertext);
    let tag = mac.finalize().into_bytes();

    let mut payload = Zeroizing::new(Vec::with_capacity(iv.len() + ciphertext.len() + HMAC_LEN));
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ciphertext);
    payload.extend_from_slice(&tag);

    Ok(format!("{}{}", V2_MARKER, BASE64.encode(payload.as_slice())))
}

/// Decrypt a credential blob, dispatching on format per §4.2.
pub fn decrypt(blob: &str, keys: &CredentialVaultKeys) -> Result<String, VaultError> {
    let remainder = blob.strip_prefix(LEGACY_PREFIX).unwrap_or(blob);

    if let Some(v2_body) = remainder.strip_prefix("v2:") {
        return decrypt_v2(v2_body, keys);
    }

    if let Some(v1_body) = remainder.strip_prefix("v1:") {
        return decrypt_v1(v1_body, keys);
    }

    if BASE64.decode(remainder).is_ok() && looks_like_base64(remainder) {
        return decrypt_v1(remainder, keys);
    }

    // Legacy unencrypted value, written before encryption was introduced.
    // Surfaced verbatim for compatibility; a fresh implementation should
    // flag this (§9 Open Question 2).
    tracing::warn!("credential vault read a plaintext value with no encryption marker");
    Ok(blob.to_string())
}

fn looks_like_base64(s: &str) -> bool {
    !s.is_empty()
        && s.len() % 4 == 0
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
}

fn decrypt_v2(body: &str, keys: &CredentialVaultKeys) -> Result<String, VaultError> {
    let payload = Zeroizing::new(
        BASE64
            .decode(body)
            .map_err(|_| VaultError::CorruptedCredential)?,
    );

    if payload.len() < 16 + HMAC_LEN {
        return Err(VaultError::CorruptedCredential);
    }

    let (iv, rest) = payload.split_at(16);
    let (ciphertext, tag) = rest.split_at(rest.len() - HMAC_LEN);

    let hmac_key = Zeroizing::new(Sha256::digest(keys.key).to_vec());
    let mut mac = HmacSha256::new_from_slice(&hmac_key)
        .map_err(|e| VaultError::KeyUnavailable(e.to_string()))?;
    mac.update(iv);
    mac.update(ciphertext);
    let expected = mac.finalize().into_bytes();

    if expected.as_slice().ct_eq(tag).unwrap_u8() != 1 {
        return Err(VaultError::CorruptedCredential);
    }

    let mut iv_arr = [0u8; 16];
    iv_arr.copy_from_slice(iv);

    let ciphertext_buf = Zeroizing::new(ciphertext.to_vec());
    let plaintext = Zeroizing::new(
        Aes256CbcDec::new(&keys.key.into(), &iv_arr.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext_buf)
            .map_err(|_| VaultError::CorruptedCredential)?,
    );

    String::from_utf8(plaintext.to_vec()).map_err(|_| VaultError::CorruptedCredential)
}

fn decrypt_v1(body: &str, keys: &CredentialVaultKeys) -> Result<String, VaultError> {
    let ciphertext = Zeroizing::new(
        BASE64
            .decode(body)
            .map_err(|_| VaultError::CorruptedCredential)?,
    );

    let plaintext = Zeroizing::new(
        Aes256CbcDec::new(&keys.key.into(), &keys.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| VaultError::CorruptedCredential)?,
    );

    String::from_utf8(plaintext.to_vec()).map_err(|_| VaultError::CorruptedCredential)
}

/// Encode a v1-format blob for test fixtures exercising the legacy reader.
#[cfg(test)]
pub(crate) fn encrypt_v1_for_test(plaintext: &str, keys: &CredentialVaultKeys) -> String {
    let ciphertext = Aes256CbcEnc::new(&keys.key.into(), &keys.iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    BASE64.encode(ciphertext)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
