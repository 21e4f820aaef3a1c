//! Custom error types for gitmanager
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the gitmanager application
#[derive(Error, Debug)]
pub enum GitManagerError {
    /// Key material is not URL-safe base64 or does not decode to 32 bytes
    #[error("Invalid encryption key: {0}\n\n  → The key must be URL-safe base64 that decodes to exactly 32 bytes.\n  → Run 'gitmanager keygen' to create a new one.")]
    InvalidKey(String),

    /// Token file exists but cannot be decrypted or parsed
    #[error("Token file is unreadable: {0}\n\n  → The key may be wrong, or the file is corrupted.")]
    CorruptStore(String),

    /// Not inside a git repository with an origin remote
    #[error("No git repository with an 'origin' remote was found.\n\n  → Run gitmanager inside a cloned repository.\n  → Run 'git remote -v' to check your remotes.")]
    NoRepository,

    /// Remote URL could not be interpreted
    #[error("Cannot parse remote URL: {0}\n\n  → Expected format: https://github.com/owner/repo or git@github.com:owner/repo")]
    InvalidRemoteUrl(String),

    /// An external command could not be started or exited with failure
    #[error("Command failed: {0}")]
    Subprocess(String),

    /// Clipboard copy failed or no clipboard backend is available
    #[error("Clipboard copy failed: {0}")]
    Clipboard(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to encode token data: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Operation cancelled by user
    #[error("Operation cancelled.")]
    Cancelled,
}

impl GitManagerError {
    /// Whether an interactive session can carry on after this error
    ///
    /// Failed commands and bad input are reported to the user; storage and
    /// key errors end the program.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GitManagerError::Subprocess(_)
                | GitManagerError::Clipboard(_)
                | GitManagerError::InvalidInput(_)
                | GitManagerError::InvalidRemoteUrl(_)
                | GitManagerError::Cancelled
        )
    }
}

impl From<toml::de::Error> for GitManagerError {
    fn from(err: toml::de::Error) -> Self {
        GitManagerError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for GitManagerError {
    fn from(err: toml::ser::Error) -> Self {
        GitManagerError::Toml(err.to_string())
    }
}

impl From<inquire::InquireError> for GitManagerError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => GitManagerError::Cancelled,
            other => GitManagerError::InvalidInput(other.to_string()),
        }
    }
}

/// Result type alias using GitManagerError
pub type Result<T> = std::result::Result<T, GitManagerError>;
