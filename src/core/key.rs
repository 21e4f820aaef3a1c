//! Encryption key material
//!
//! The token file is protected by a 256-bit key that the user supplies on
//! every run, either through an environment variable or a masked prompt.
//! Externally the key is a URL-safe base64 string decoding to exactly 32
//! bytes; it is never written to disk.
//!
//! ## Source Priority
//!
//! 1. Environment variable (default `GITMANAGER_KEY`) - any failure is fatal
//! 2. Interactive prompt - only when the variable is entirely absent

use std::env::VarError;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::prompt::Prompter;
use crate::error::{GitManagerError, Result};

/// Size of the symmetric key in bytes
pub const KEY_SIZE: usize = 32;

/// Environment variable consulted for the key when none is configured
pub const DEFAULT_KEY_ENV: &str = "GITMANAGER_KEY";

/// URL-safe base64 that emits padding but accepts input with or without it
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A 256-bit encryption key that is zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: [u8; KEY_SIZE],
}

impl Key {
    /// Generate a new random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create a key from raw bytes, which must be exactly 32 long
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(GitManagerError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }
        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Export the key as URL-safe base64 (with padding)
    pub fn to_base64(&self) -> String {
        URL_SAFE_LENIENT.encode(self.bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key").field("bytes", &"[REDACTED]").finish()
    }
}

/// Decode a URL-safe base64 string into a key
///
/// Surrounding whitespace is ignored. Fails with `InvalidKey` when the input
/// is not base64 or does not decode to exactly 32 bytes.
pub fn derive_key(source: &str) -> Result<Key> {
    let decoded = Zeroizing::new(
        URL_SAFE_LENIENT
            .decode(source.trim())
            .map_err(|e| GitManagerError::InvalidKey(format!("not valid base64 ({})", e)))?,
    );
    Key::from_bytes(&decoded)
}

/// Resolve the key from the environment, prompting only if the variable is unset
pub fn resolve_key(env_var: &str, prompter: &dyn Prompter) -> Result<Key> {
    let env_value = match std::env::var(env_var) {
        Ok(value) => Some(Zeroizing::new(value)),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(_)) => {
            return Err(GitManagerError::InvalidKey(format!(
                "{} is not valid unicode",
                env_var
            )))
        }
    };
    key_from_sources(env_var, env_value.as_deref().map(String::as_str), prompter)
}

/// Choose between an environment value and the prompt
///
/// A present environment value is final: decoding failures are returned
/// without falling back to the prompt.
pub(crate) fn key_from_sources(
    env_var: &str,
    env_value: Option<&str>,
    prompter: &dyn Prompter,
) -> Result<Key> {
    if let Some(value) = env_value {
        debug!(env_var, "using encryption key from environment");
        return derive_key(value).map_err(|e| match e {
            GitManagerError::InvalidKey(reason) => {
                GitManagerError::InvalidKey(format!("{} is invalid: {}", env_var, reason))
            }
            other => other,
        });
    }

    let entered =
        Zeroizing::new(prompter.read_secret("Enter your encryption key for GitManager tokens:")?);
    derive_key(&entered)
}
