//! gitmanager - an interactive git helper with encrypted token storage
//!
//! This library provides the menu-driven git workflow and the per-repository
//! GitHub token store it relies on. Tokens are kept in a single file sealed
//! with AES-256-GCM under a key the user supplies on every run.

pub mod cli;
pub mod core;
pub mod error;

#[cfg(test)]
mod testing;

pub use error::{GitManagerError, Result};
