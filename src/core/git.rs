//! Local git repository operations
//!
//! Thin wrappers around the `git` binary for everything the menus offer:
//! - Remote detection
//! - Pull and push through an authenticated URL
//! - Staging, committing and reverting
//! - Branch management
//! - Sparse-checkout based untracking
//!
//! All invocations go through a [`CommandRunner`] with explicit argument
//! vectors. Credentials embedded in a remote URL are masked in anything this
//! module returns.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::core::runner::{CommandOutput, CommandRunner};
use crate::error::{GitManagerError, Result};

/// Git operations executed through a command runner
pub struct GitCommands<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> GitCommands<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Run git, failing with the (redacted) stderr on a non-zero exit
    fn git(&self, args: &[&str], action: &str) -> Result<CommandOutput> {
        let output = self.runner.run("git", args)?;
        let output = redact_output(output, args);

        if !output.success() {
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            return Err(GitManagerError::Subprocess(format!(
                "{} failed: {}",
                action, detail
            )));
        }

        Ok(output)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Repository info
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the origin remote URL, if the current directory has one
    pub fn origin_url(&self) -> Result<Option<String>> {
        let output = self.runner.run("git", &["remote", "get-url", "origin"])?;
        if !output.success() {
            return Ok(None);
        }
        let url = output.stdout.trim();
        Ok((!url.is_empty()).then(|| url.to_string()))
    }

    /// Full `git status` text
    pub fn status(&self) -> Result<String> {
        Ok(self.git(&["status"], "git status")?.stdout)
    }

    /// Paths reported by `git status --short`
    pub fn changed_files(&self) -> Result<Vec<String>> {
        let output = self.git(&["status", "--short"], "git status")?;
        Ok(parse_short_status(&output.stdout))
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        let output = self.git(&["branch", "--show-current"], "git branch")?;
        let branch = output.stdout.trim();
        if branch.is_empty() {
            // Detached HEAD state
            return Ok("HEAD".to_string());
        }
        Ok(branch.to_string())
    }

    /// `git branch` listing, with the current branch marked
    pub fn list_branches(&self) -> Result<String> {
        Ok(self.git(&["branch"], "git branch")?.stdout)
    }

    /// All files tracked by the index
    pub fn tracked_files(&self) -> Result<Vec<String>> {
        let output = self.git(&["ls-files"], "git ls-files")?;
        Ok(non_empty_lines(&output.stdout))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remote operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pull(&self, remote: &SecretString) -> Result<CommandOutput> {
        self.git(&["pull", remote.expose_secret()], "Pull")
    }

    pub fn push(&self, remote: &SecretString, force: bool) -> Result<CommandOutput> {
        let mut args = vec!["push", remote.expose_secret()];
        if force {
            args.push("--force");
        }
        self.git(&args, "Push")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Staging and commits
    // ─────────────────────────────────────────────────────────────────────────

    /// Stage everything in the working tree
    pub fn add_all(&self) -> Result<CommandOutput> {
        self.git(&["add", "."], "git add")
    }

    /// Stage specific paths
    pub fn add_paths(&self, paths: &[String]) -> Result<CommandOutput> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args, "git add")
    }

    pub fn commit(&self, message: &str) -> Result<CommandOutput> {
        self.git(&["commit", "-m", message], "Commit")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Revert operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a commit undoing HEAD
    pub fn revert_last_commit(&self) -> Result<CommandOutput> {
        self.git(&["revert", "--no-edit", "HEAD"], "Revert")
    }

    /// Drop the last commit from the branch and the working tree
    pub fn reset_last_commit(&self) -> Result<CommandOutput> {
        self.git(&["reset", "--hard", "HEAD~1"], "Reset")
    }

    /// Unstage everything
    pub fn unstage_all(&self) -> Result<CommandOutput> {
        self.git(&["reset"], "Reset")
    }

    pub fn merge_abort(&self) -> Result<CommandOutput> {
        self.git(&["merge", "--abort"], "Merge abort")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Branch operations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn create_branch(&self, name: &str) -> Result<CommandOutput> {
        self.git(&["branch", "--", name], "Branch creation")
    }

    pub fn delete_branch(&self, name: &str) -> Result<CommandOutput> {
        self.git(&["branch", "-d", "--", name], "Branch deletion")
    }

    pub fn checkout(&self, name: &str) -> Result<CommandOutput> {
        self.git(&["checkout", name, "--"], "Checkout")
    }

    /// Merge `name` into the current branch without opening an editor
    pub fn merge(&self, name: &str) -> Result<CommandOutput> {
        self.git(&["merge", "--no-edit", name], "Merge")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sparse checkout
    // ─────────────────────────────────────────────────────────────────────────

    /// Patterns currently included by sparse-checkout, empty when disabled
    pub fn sparse_checkout_list(&self) -> Result<Vec<String>> {
        let output = self.runner.run("git", &["sparse-checkout", "list"])?;
        if !output.success() {
            return Ok(Vec::new());
        }
        Ok(non_empty_lines(&output.stdout))
    }

    /// Enable non-cone sparse-checkout and include exactly `paths`
    pub fn sparse_checkout_set(&self, paths: &[String]) -> Result<CommandOutput> {
        // init fails harmlessly when sparse-checkout is already enabled
        let _ = self
            .runner
            .run("git", &["sparse-checkout", "init", "--no-cone"])?;

        let mut args = vec!["sparse-checkout", "set", "--no-cone"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args, "sparse-checkout set")?;
        self.git(&["checkout"], "Checkout")
    }

    pub fn sparse_checkout_disable(&self) -> Result<CommandOutput> {
        self.git(&["sparse-checkout", "disable"], "sparse-checkout disable")
    }
}

/// Parse `git status --short` lines into paths
///
/// Renames (`R  old -> new`) yield the new path; quoted paths are unquoted.
pub fn parse_short_status(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| {
            let path = &line[3..];
            let path = path.rsplit_once(" -> ").map_or(path, |(_, new)| new);
            unquote(path)
        })
        .collect()
}

fn unquote(path: &str) -> String {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .map(|p| p.replace("\\\"", "\"").replace("\\\\", "\\"))
        .unwrap_or_else(|| path.to_string())
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Mask any password carried by a URL argument in the command's output
fn redact_output(mut output: CommandOutput, args: &[&str]) -> CommandOutput {
    for arg in args {
        let Ok(url) = Url::parse(arg) else { continue };
        let Some(password) = url.password() else {
            continue;
        };
        if password.is_empty() {
            continue;
        }
        output.stdout = output.stdout.replace(password, "***");
        output.stderr = output.stderr.replace(password, "***");
    }
    output
}
