// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::keys::{IV_LEN, KEY_LEN};

fn test_keys() -> CredentialVaultKeys {
    CredentialVaultKeys {
        key: [7u8; KEY_LEN],
        iv: [9u8; IV_LEN],
    }
}

#[test]
fn encrypt_produces_v2_marker() {
    let keys = test_keys();
    let blob = encrypt("pa$$w0rd", &keys).unwrap();
    assert!(blob.starts_with(V2_MARKER));
}

#[test]
fn round_trip_encrypt_decrypt() {
    let keys = test_keys();
    let blob = encrypt("pa$$w0rd", &keys).unwrap();
    let plain = decrypt(&blob, &keys).unwrap();
    assert_eq!(plain, "pa$$w0rd");
}

#[test]
fn encrypt_rejects_empty_input() {
    let keys = test_keys();
    let err = encrypt("", &keys).unwrap_err();
    assert!(matches!(err, VaultError::EmptyInput));
}

#[test]
fn bit_flip_in_base64_body_fails_authentication() {
    let keys = test_keys();
    let blob = encrypt("pa$$w0rd", &keys).unwrap();
    let body = blob.strip_prefix(V2_MARKER).unwrap();
    let mut raw = base64::engine::general_purpose::STANDARD.decode(body).unwrap();
    let idx = raw.len() / 2;
    raw[idx] ^= 0x01;
    let corrupted = format!(
        "{}{}",
        V2_MARKER,
        base64::engine::general_purpose::STANDARD.encode(raw)
    );
    let err = decrypt(&corrupted, &keys).unwrap_err();
    assert!(matches!(err, VaultError::CorruptedCredential));
}

#[test]
fn every_byte_flip_fails_authentication() {
    let keys = test_keys();
    let blob = encrypt("pa$$w0rd", &keys).unwrap();
    let body = blob.strip_prefix(V2_MARKER).unwrap();
    let raw = base64::engine::general_purpose::STANDARD.decode(body).unwrap();
    for idx in 0..raw.len() {
        let mut flipped = raw.clone();
        flipped[idx] ^= 0x01;
        let corrupted = format!(
            "{}{}",
            V2_MARKER,
            base64::engine::general_purpose::STANDARD.encode(flipped)
        );
        assert!(matches!(
            decrypt(&corrupted, &keys).unwrap_err(),
            VaultError::CorruptedCredential
        ));
    }
}

#[test]
fn legacy_v1_blob_is_readable() {
    let keys = test_keys();
    let v1_body = encrypt_v1_for_test("legacy-secret", &keys);
    let blob = format!("SERVY_ENC:v1:{}", v1_body);
    let plain = decrypt(&blob, &keys).unwrap();
    assert_eq!(plain, "legacy-secret");
}

#[test]
fn bare_base64_without_marker_is_read_as_v1() {
    let keys = test_keys();
    let v1_body = encrypt_v1_for_test("legacy-secret", &keys);
    let plain = decrypt(&v1_body, &keys).unwrap();
    assert_eq!(plain, "legacy-secret");
}

#[test]
fn plaintext_value_returned_verbatim() {
    let keys = test_keys();
    let plain = decrypt("not encrypted at all!", &keys).unwrap();
    assert_eq!(plain, "not encrypted at all!");
}

#[test]
fn v2_is_never_written_by_new_encrypt_calls() {
    let keys = test_keys();
    for secret in ["a", "longer secret value", "unicode: caf\u{e9}"] {
        let blob = encrypt(secret, &keys).unwrap();
        assert!(blob.starts_with(V2_MARKER));
    }
}
