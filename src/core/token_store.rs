//! Encrypted per-repository token storage
//!
//! Tokens live in a single file holding an encrypted JSON object that maps
//! repository URLs to GitHub tokens. The file is read once when the store is
//! opened and rewritten after every mutation.
//!
//! A missing file is an empty store. An unreadable one (wrong key, truncated
//! write, tampering) is also treated as empty, with a warning, so a damaged
//! file never locks the user out of the tool.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::cipher;
use crate::core::key::Key;
use crate::core::prompt::Prompter;
use crate::error::{GitManagerError, Result};

/// Repository URL to token mapping
pub type TokenMap = BTreeMap<String, String>;

/// Outcome of removing a repository's token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
}

/// Load the token mapping from `path`
///
/// Never fails: a missing, unreadable or undecryptable file yields an empty
/// mapping.
pub fn load(path: &Path, key: &Key) -> TokenMap {
    let envelope = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "token file does not exist yet");
            return TokenMap::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read token file, starting empty");
            return TokenMap::new();
        }
    };

    match decode_tokens(key, &envelope) {
        Ok(tokens) => {
            if let Ok(written) = cipher::sealed_at(&envelope) {
                debug!(count = tokens.len(), %written, "loaded token file");
            }
            tokens
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error decrypting token file, starting empty");
            TokenMap::new()
        }
    }
}

fn decode_tokens(key: &Key, envelope: &[u8]) -> Result<TokenMap> {
    let plaintext = Zeroizing::new(cipher::open(key, envelope)?);
    serde_json::from_slice(&plaintext)
        .map_err(|e| GitManagerError::CorruptStore(format!("not a token mapping ({})", e)))
}

/// Encrypt `tokens` and overwrite the file at `path`
///
/// Parent directories are created as needed. The write is not atomic; a
/// partially written file is later loaded as empty.
pub fn save(path: &Path, key: &Key, tokens: &TokenMap) -> Result<()> {
    let plaintext = Zeroizing::new(serde_json::to_vec(tokens)?);
    let envelope = cipher::seal(key, &plaintext)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = open_for_write(path)?;
    file.write_all(envelope.as_bytes())?;
    file.flush()?;

    debug!(path = %path.display(), count = tokens.len(), "saved token file");
    Ok(())
}

#[cfg(unix)]
fn open_for_write(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// File-backed encrypted token store
pub struct TokenStore {
    path: PathBuf,
    key: Key,
    tokens: TokenMap,
}

impl TokenStore {
    /// Open the store at `path`, loading whatever can be decrypted
    pub fn open(path: impl Into<PathBuf>, key: Key) -> Self {
        let path = path.into();
        let tokens = load(&path, &key);
        Self { path, key, tokens }
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the token stored for a repository
    pub fn get(&self, repo_id: &str) -> Option<SecretString> {
        self.tokens
            .get(repo_id)
            .map(|token| SecretString::from(token.clone()))
    }

    /// Check whether a repository has a token
    pub fn contains(&self, repo_id: &str) -> bool {
        self.tokens.contains_key(repo_id)
    }

    /// Repository identifiers in sorted order
    pub fn repositories(&self) -> Vec<String> {
        self.tokens.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Return the stored token, or ask for one and persist it
    ///
    /// Empty input is an error; the caller is expected to exit.
    pub fn get_or_prompt(&mut self, repo_id: &str, prompter: &dyn Prompter) -> Result<SecretString> {
        if let Some(token) = self.get(repo_id) {
            return Ok(token);
        }

        let entered = Zeroizing::new(prompter.read_secret(&format!(
            "No token found for {}.\nEnter your GitHub token:",
            repo_id
        ))?);
        if entered.is_empty() {
            return Err(GitManagerError::InvalidInput(
                "No token entered. Exiting program.".to_string(),
            ));
        }

        self.insert(repo_id, &entered)?;
        println!("Token saved for {}.", repo_id);
        Ok(SecretString::from(entered.to_string()))
    }

    /// Store or replace a token and persist the mapping
    pub fn insert(&mut self, repo_id: &str, token: &str) -> Result<()> {
        let token = token.trim();
        if repo_id.trim().is_empty() {
            return Err(GitManagerError::InvalidInput(
                "Repository URL cannot be empty.".to_string(),
            ));
        }
        if token.is_empty() {
            return Err(GitManagerError::InvalidInput(
                "Token cannot be empty.".to_string(),
            ));
        }

        let mut updated = self.tokens.clone();
        updated.insert(repo_id.to_string(), token.to_string());
        self.commit(updated)
    }

    /// Remove a repository's token
    ///
    /// When the repository is unknown nothing is written.
    pub fn remove(&mut self, repo_id: &str) -> Result<Removal> {
        if !self.tokens.contains_key(repo_id) {
            return Ok(Removal::NotFound);
        }

        let mut updated = self.tokens.clone();
        updated.remove(repo_id);
        self.commit(updated)?;
        Ok(Removal::Removed)
    }

    /// Delete every token, returning how many were removed
    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.tokens.len();
        self.commit(TokenMap::new())?;
        Ok(removed)
    }

    /// Persist `updated` and adopt it only once it is on disk
    fn commit(&mut self, updated: TokenMap) -> Result<()> {
        save(&self.path, &self.key, &updated)?;
        self.tokens = updated;
        Ok(())
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("path", &self.path)
            .field("repositories", &self.tokens.keys().collect::<Vec<_>>())
            .finish()
    }
}
