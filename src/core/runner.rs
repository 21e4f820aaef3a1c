//! External command execution
//!
//! Every `git` and clipboard invocation goes through a `CommandRunner`.
//! Commands are always spawned from an argument vector, never through a
//! shell, so branch names, commit messages and file names are passed to the
//! program verbatim.

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::repository::redact_url;
use crate::error::{GitManagerError, Result};

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

/// Runs external programs and captures their output
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit
    ///
    /// A non-zero exit is reported through `CommandOutput::status_code`; only
    /// failures to start the program are errors.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Like [`CommandRunner::run`], writing `input` to the program's stdin
    fn run_with_input(&self, program: &str, args: &[&str], input: &[u8]) -> Result<CommandOutput>;

    /// Check whether `program` can be found on `PATH`
    fn is_available(&self, program: &str) -> bool;
}

/// Real implementation using std::process::Command
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    fn log_invocation(program: &str, args: &[&str]) {
        let shown: Vec<String> = args.iter().map(|arg| redact_url(arg)).collect();
        debug!(program, args = ?shown, "running command");
    }

    fn spawn_error(program: &str, e: std::io::Error) -> GitManagerError {
        if e.kind() == ErrorKind::NotFound {
            GitManagerError::Subprocess(format!("'{}' is not installed or not on PATH", program))
        } else {
            GitManagerError::Subprocess(format!("Failed to execute {}: {}", program, e))
        }
    }

    fn capture(output: std::process::Output) -> CommandOutput {
        CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        Self::log_invocation(program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(program, e))?;

        Ok(Self::capture(output))
    }

    fn run_with_input(&self, program: &str, args: &[&str], input: &[u8]) -> Result<CommandOutput> {
        Self::log_invocation(program, args);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_error(program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(input) {
                drop(stdin);
                // Reap the child before reporting; it usually exited early
                let status = child
                    .wait_with_output()
                    .map(|output| output.status.code().unwrap_or(-1).to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                return Err(GitManagerError::Subprocess(format!(
                    "Failed to write to {} (exit status {}): {}",
                    program, status, e
                )));
            }
            // stdin is dropped here so the program sees EOF
        }

        let output = child.wait_with_output()?;
        Ok(Self::capture(output))
    }

    fn is_available(&self, program: &str) -> bool {
        let Some(paths) = std::env::var_os("PATH") else {
            return false;
        };

        std::env::split_paths(&paths).any(|dir| executable_in(&dir, program))
    }
}

fn executable_in(dir: &Path, program: &str) -> bool {
    if dir.join(program).is_file() {
        return true;
    }
    cfg!(windows) && dir.join(format!("{}.exe", program)).is_file()
}
