//! Token management menu
//!
//! Shown when gitmanager is started outside a repository with an `origin`
//! remote, so stored tokens can still be inspected and maintained.

use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::cli::{parse_selection, print_numbered, run_menu, Flow};
use crate::core::clipboard::ClipboardWriter;
use crate::core::prompt::Prompter;
use crate::core::repository::normalize_remote_url;
use crate::core::token_store::{Removal, TokenStore};
use crate::error::{GitManagerError, Result};

const TOKEN_MENU: &str = "\
Token Management:
1. List stored repositories
2. Copy a token to clipboard
3. Add a token
4. Delete a token
5. Delete all tokens
0. Exit";

/// Token menu over a loaded store
pub struct TokenMenu<'a> {
    store: &'a mut TokenStore,
    prompter: &'a dyn Prompter,
    clipboard: &'a dyn ClipboardWriter,
}

impl<'a> TokenMenu<'a> {
    pub fn new(
        store: &'a mut TokenStore,
        prompter: &'a dyn Prompter,
        clipboard: &'a dyn ClipboardWriter,
    ) -> Self {
        Self {
            store,
            prompter,
            clipboard,
        }
    }

    /// Run the menu until the user exits
    pub fn run(&mut self) -> Result<()> {
        println!("No git repository detected. Managing stored tokens.");
        let prompter = self.prompter;
        run_menu(prompter, TOKEN_MENU, |choice| self.handle(choice))
    }

    /// Handle a single menu choice
    pub fn handle(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.list(),
            "2" => self.copy()?,
            "3" => self.add()?,
            "4" => self.delete()?,
            "5" => self.delete_all()?,
            "0" | "exit" => return Ok(Flow::Exit),
            _ => println!("Unrecognized option."),
        }
        Ok(Flow::Continue)
    }

    fn list(&self) {
        if self.store.is_empty() {
            println!("No tokens stored.");
            return;
        }
        println!("Stored repositories:");
        print_numbered(&self.store.repositories());
    }

    /// Ask for one stored repository by number
    fn select_repository(&self, prompt: &str) -> Result<Option<String>> {
        let repos = self.store.repositories();
        if repos.is_empty() {
            println!("No tokens stored.");
            return Ok(None);
        }

        print_numbered(&repos);
        let input = self.prompter.read_line(prompt)?;
        match parse_selection(&input, repos.len()).as_slice() {
            [idx] => Ok(Some(repos[*idx].clone())),
            _ => Err(GitManagerError::InvalidInput(
                "Invalid selection.".to_string(),
            )),
        }
    }

    fn copy(&self) -> Result<()> {
        let Some(repo) = self.select_repository("Select a repository to copy its token:")? else {
            return Ok(());
        };
        if let Some(token) = self.store.get(&repo) {
            self.clipboard.copy(token.expose_secret())?;
            println!(
                "✓ Token for {} copied to clipboard ({}).",
                repo,
                self.clipboard.name()
            );
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let url = self.prompter.read_line("Enter the repository URL:")?;
        if url.is_empty() {
            return Err(GitManagerError::InvalidInput(
                "Repository URL cannot be empty.".to_string(),
            ));
        }
        let repo = normalize_remote_url(&url)?;

        let token = Zeroizing::new(self.prompter.read_secret("Enter the GitHub token:")?);
        if token.trim().is_empty() {
            return Err(GitManagerError::InvalidInput(
                "Token cannot be empty.".to_string(),
            ));
        }

        let replaced = self.store.contains(&repo);
        self.store.insert(&repo, &token)?;
        if replaced {
            println!("✓ Token updated for {}.", repo);
        } else {
            println!("✓ Token saved for {}.", repo);
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(repo) = self.select_repository("Select a repository to delete its token:")? else {
            return Ok(());
        };
        match self.store.remove(&repo)? {
            Removal::Removed => println!("✓ Token for {} deleted.", repo),
            Removal::NotFound => println!("No token found for {}.", repo),
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        if self.store.is_empty() {
            println!("No tokens stored.");
            return Ok(());
        }
        if !self
            .prompter
            .confirm("Delete ALL stored tokens? This cannot be undone.")?
        {
            println!("Cancelled.");
            return Ok(());
        }
        let removed = self.store.clear()?;
        println!("✓ Deleted {} token(s).", removed);
        Ok(())
    }
}
