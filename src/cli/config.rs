//! Configuration CLI command handlers

use std::path::Path;

use crate::cli::commands::ConfigCommand;
use crate::core::config::Config;
use crate::error::{GitManagerError, Result};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand, config: &Config) -> Result<()> {
    let path = Config::config_path()?;
    match command {
        ConfigCommand::Show => handle_show(config, &path),
        ConfigCommand::Init { force } => handle_init(&path, force),
    }
}

/// Print the effective configuration
fn handle_show(config: &Config, path: &Path) -> Result<()> {
    let source = if path.exists() { "" } else { " (not created, using defaults)" };
    println!("Config file: {}{}", path.display(), source);
    println!("Token file: {}", config.token_path()?.display());
    println!("Key variable: {}", config.key_env);
    println!("Default commit message: {}", config.default_commit_message);
    Ok(())
}

/// Write the default configuration to `path`
fn handle_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(GitManagerError::Config(format!(
            "{} already exists.\n\n  → Use --force to overwrite it.",
            path.display()
        )));
    }
    Config::default().save_to(path)?;
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}
