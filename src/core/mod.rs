//! Core functionality for gitmanager
//!
//! This module contains shared business logic including:
//! - Encryption key handling
//! - The encrypted token store
//! - Repository context detection
//! - Git and clipboard command execution
//! - Application configuration

pub mod cipher;
pub mod clipboard;
pub mod config;
pub mod git;
pub mod key;
pub mod prompt;
pub mod repository;
pub mod runner;
pub mod token_store;

pub use clipboard::ClipboardWriter;
pub use config::Config;
pub use git::GitCommands;
pub use key::Key;
pub use prompt::Prompter;
pub use repository::RepositoryContext;
pub use runner::CommandRunner;
pub use token_store::TokenStore;
