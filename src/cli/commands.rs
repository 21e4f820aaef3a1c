//! CLI command definitions using clap
//!
//! Defines the command structure for the `gitmanager` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gitmanager - interactive git helper with encrypted token storage
///
/// Run without arguments inside a repository to open the menu. Outside a
/// repository the token management menu is shown instead.
#[derive(Parser, Debug)]
#[command(name = "gitmanager", version, about, long_about = None)]
pub struct Cli {
    /// Pull from origin with the stored token and exit
    #[arg(long, conflicts_with = "push")]
    pub pull: bool,

    /// Push existing commits to origin with the stored token and exit
    #[arg(long)]
    pub push: bool,

    /// Path of the encrypted token file
    #[arg(long, env = "GITMANAGER_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Environment variable that holds the encryption key
    #[arg(long, global = true)]
    pub key_env: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new encryption key
    Keygen,

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a config file with the default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, short)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pull_and_push_conflict() {
        assert!(Cli::try_parse_from(["gitmanager", "--pull", "--push"]).is_err());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "gitmanager",
            "--push",
            "--token-file",
            "/tmp/tokens",
            "--key-env",
            "ALT_KEY",
        ])
        .unwrap();
        assert!(cli.push);
        assert!(!cli.pull);
        assert_eq!(cli.token_file, Some(PathBuf::from("/tmp/tokens")));
        assert_eq!(cli.key_env.as_deref(), Some("ALT_KEY"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_keygen() {
        let cli = Cli::try_parse_from(["gitmanager", "keygen"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Keygen)));
    }
}
