//! User input abstraction
//!
//! Menus and the token store read from a `Prompter` so that interactive
//! flows can be driven by scripted input in tests.

use std::io::{self, BufRead, IsTerminal, Write};

use inquire::{Password, PasswordDisplayMode};

use crate::error::{GitManagerError, Result};

/// Source of interactive user input
pub trait Prompter {
    /// Show `prompt` and read one trimmed line
    ///
    /// Returns `Cancelled` when input is closed.
    fn read_line(&self, prompt: &str) -> Result<String>;

    /// Read a secret without echoing it
    fn read_secret(&self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question; only `y` or `yes` count as agreement
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{} (y/N):", prompt))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Prompter reading from the process stdin
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}\n>> ", prompt)?;
        stdout.flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(GitManagerError::Cancelled);
        }
        Ok(input.trim().to_string())
    }

    fn read_secret(&self, prompt: &str) -> Result<String> {
        // Masked input needs a terminal; piped stdin is read as a plain line
        if !io::stdin().is_terminal() {
            return self.read_line(prompt);
        }
        let secret = Password::new(prompt)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        Ok(secret.trim().to_string())
    }
}
