//! Authenticated encryption envelope for the token file
//!
//! The envelope is a self-contained URL-safe base64 string:
//!
//! ```text
//! version (1) | timestamp (8, big-endian seconds) | nonce (12) | ciphertext + tag
//! ```
//!
//! Version and timestamp are bound to the ciphertext as associated data, so
//! altering any byte of the envelope is detected when it is opened. Only
//! canonically padded base64 is accepted, followed by at most one newline.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};

use crate::core::key::Key;
use crate::error::{GitManagerError, Result};

/// Current envelope format
const VERSION: u8 = 0x01;

const TIMESTAMP_SIZE: usize = 8;

/// Size of AES-GCM nonce in bytes
const NONCE_SIZE: usize = 12;

/// Size of AES-GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

const HEADER_SIZE: usize = 1 + TIMESTAMP_SIZE;

/// Encrypt `plaintext` into an envelope stamped with the current time
pub fn seal(key: &Key, plaintext: &[u8]) -> Result<String> {
    seal_at(key, plaintext, Utc::now())
}

fn seal_at(key: &Key, plaintext: &[u8], timestamp: DateTime<Utc>) -> Result<String> {
    let mut header = [0u8; HEADER_SIZE];
    header[0] = VERSION;
    header[1..].copy_from_slice(&timestamp.timestamp().to_be_bytes());

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| GitManagerError::InvalidKey(e.to_string()))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| GitManagerError::CorruptStore("encryption failed".to_string()))?;

    let mut raw = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + ciphertext.len());
    raw.extend_from_slice(&header);
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);

    Ok(URL_SAFE.encode(raw))
}

/// Decrypt an envelope produced by [`seal`]
///
/// Every failure (bad encoding, unknown version, truncation, wrong key or
/// tampering) is reported as `CorruptStore`.
pub fn open(key: &Key, envelope: &[u8]) -> Result<Vec<u8>> {
    let raw = decode(envelope)?;

    let (header, rest) = raw.split_at(HEADER_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| GitManagerError::InvalidKey(e.to_string()))?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| {
            GitManagerError::CorruptStore(
                "decryption failed (invalid key or corrupted data)".to_string(),
            )
        })
}

/// Read the unauthenticated creation time of an envelope
pub fn sealed_at(envelope: &[u8]) -> Result<DateTime<Utc>> {
    let raw = decode(envelope)?;
    let mut seconds = [0u8; TIMESTAMP_SIZE];
    seconds.copy_from_slice(&raw[1..HEADER_SIZE]);

    Utc.timestamp_opt(i64::from_be_bytes(seconds), 0)
        .single()
        .ok_or_else(|| GitManagerError::CorruptStore("invalid timestamp".to_string()))
}

/// Base64-decode and check version and minimum length
fn decode(envelope: &[u8]) -> Result<Vec<u8>> {
    // At most one trailing newline is accepted
    let text = envelope.strip_suffix(b"\n").unwrap_or(envelope);
    let raw = URL_SAFE
        .decode(text)
        .map_err(|e| GitManagerError::CorruptStore(format!("not a valid envelope ({})", e)))?;

    if raw.len() < HEADER_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(GitManagerError::CorruptStore(format!(
            "envelope too short ({} bytes)",
            raw.len()
        )));
    }
    if raw[0] != VERSION {
        return Err(GitManagerError::CorruptStore(format!(
            "unsupported envelope version {:#04x}",
            raw[0]
        )));
    }
    Ok(raw)
}
