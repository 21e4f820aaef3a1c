//! Application configuration management
//!
//! Handles loading settings from `config.toml` in the platform config
//! directory:
//! - Token file location
//! - Name of the environment variable holding the encryption key
//! - Default commit message

use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::core::key::DEFAULT_KEY_ENV;
use crate::error::{GitManagerError, Result};

/// Token file location used when nothing else is configured
pub const DEFAULT_TOKEN_FILE: &str = "~/.scripts/.safe/.gitmanager_tokens.json";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Encrypted token file; a leading `~/` expands to the home directory
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    /// Environment variable consulted for the encryption key
    #[serde(default = "default_key_env")]
    pub key_env: String,

    /// Message used when a commit message prompt is left empty
    #[serde(default = "default_commit_message")]
    pub default_commit_message: String,
}

fn default_token_file() -> PathBuf {
    PathBuf::from(DEFAULT_TOKEN_FILE)
}

fn default_key_env() -> String {
    DEFAULT_KEY_ENV.to_string()
}

fn default_commit_message() -> String {
    "Updated repository".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            key_env: default_key_env(),
            default_commit_message: default_commit_message(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "gitmanager", "gitmanager")
            .ok_or_else(|| GitManagerError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, token_file: Option<PathBuf>, key_env: Option<String>) -> Self {
        if let Some(path) = token_file {
            self.token_file = path;
        }
        if let Some(name) = key_env.filter(|name| !name.trim().is_empty()) {
            self.key_env = name;
        }
        self
    }

    /// Resolved token file path with `~` expanded
    pub fn token_path(&self) -> Result<PathBuf> {
        expand_home(&self.token_file)
    }
}

fn expand_home(path: &Path) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };

    let base_dirs = BaseDirs::new()
        .ok_or_else(|| GitManagerError::Config("Could not determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.key_env, "GITMANAGER_KEY");
        assert_eq!(config.default_commit_message, "Updated repository");
        assert_eq!(config.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "key_env = \"MY_KEY\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.key_env, "MY_KEY");
        assert_eq!(config.default_commit_message, "Updated repository");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "key_env = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(GitManagerError::Toml(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            token_file: PathBuf::from("/tmp/tokens.bin"),
            key_env: "OTHER_KEY".to_string(),
            default_commit_message: "wip".to_string(),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some(PathBuf::from("/tmp/other.json")),
            Some("ALT_KEY".to_string()),
        );
        assert_eq!(config.token_file, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.key_env, "ALT_KEY");

        let unchanged = Config::default().with_overrides(None, Some("  ".to_string()));
        assert_eq!(unchanged, Config::default());
    }

    #[test]
    fn test_token_path_expands_home() {
        let expanded = Config::default().token_path().unwrap();
        assert!(expanded.is_absolute());
        assert!(expanded.ends_with(".scripts/.safe/.gitmanager_tokens.json"));
    }

    #[test]
    fn test_absolute_token_path_unchanged() {
        let config = Config::default().with_overrides(Some(PathBuf::from("/srv/t.json")), None);
        assert_eq!(config.token_path().unwrap(), PathBuf::from("/srv/t.json"));
    }
}
