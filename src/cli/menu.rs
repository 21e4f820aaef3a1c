//! Main interactive menu, shown inside a repository

use secrecy::{ExposeSecret, SecretString};

use crate::cli::{branch, parse_selection, print_numbered, print_output, run_menu, sparse, Flow};
use crate::core::clipboard::ClipboardWriter;
use crate::core::git::GitCommands;
use crate::core::prompt::Prompter;
use crate::core::repository::RepositoryContext;
use crate::core::token_store::{Removal, TokenStore};
use crate::error::Result;

const MAIN_MENU: &str = "\
=============== GIT MANAGER ===============
1. pull
2. push (add all + commit)
3. push (existing commit only)
4. commit only
5. interactive add
6. git status
7. show current branch
8. manage branches
9. copy token
10. revert last commit
11. revert last push
12. revert last add
13. revert last merge
14. remove this repo from git manager
15. untrack files (sparse-checkout)
16. restore untracked files
0. exit";

/// Pull from the repository's remote using the token
pub fn pull(git: &GitCommands<'_>, repo: &RepositoryContext, token: &SecretString) -> Result<()> {
    let remote = repo.authenticated_url(token)?;
    let output = git.pull(&remote)?;
    print_output(&output);
    Ok(())
}

/// Push existing commits to the repository's remote using the token
pub fn push(git: &GitCommands<'_>, repo: &RepositoryContext, token: &SecretString) -> Result<()> {
    let remote = repo.authenticated_url(token)?;
    let output = git.push(&remote, false)?;
    print_output(&output);
    Ok(())
}

/// State shared by the main menu actions
pub struct Session<'a> {
    pub store: &'a mut TokenStore,
    pub git: GitCommands<'a>,
    pub prompter: &'a dyn Prompter,
    pub clipboard: &'a dyn ClipboardWriter,
    pub repo: RepositoryContext,
    pub token: SecretString,
    pub default_commit_message: String,
}

impl Session<'_> {
    /// Run the menu until the user exits
    pub fn run(&mut self) -> Result<()> {
        let prompter = self.prompter;
        run_menu(prompter, MAIN_MENU, |choice| self.handle(choice))
    }

    /// Dispatch a single menu choice
    pub fn handle(&mut self, choice: &str) -> Result<Flow> {
        match choice.to_lowercase().as_str() {
            "1" => pull(&self.git, &self.repo, &self.token)?,
            "2" => self.commit_all_and_push()?,
            "3" => push(&self.git, &self.repo, &self.token)?,
            "4" => self.commit_only()?,
            "5" => self.interactive_add()?,
            "6" => println!("{}", self.git.status()?.trim_end()),
            "7" => println!("Current branch: {}", self.git.current_branch()?),
            "8" => branch::run_branch_menu(&self.git, self.prompter)?,
            "9" => self.copy_token()?,
            "10" => print_output(&self.git.revert_last_commit()?),
            "11" => self.revert_last_push()?,
            "12" => {
                print_output(&self.git.unstage_all()?);
                println!("Staged changes removed from the index.");
            }
            "13" => print_output(&self.git.merge_abort()?),
            "14" => {
                self.remove_repository()?;
                return Ok(Flow::Exit);
            }
            "15" => sparse::untrack_files(&self.git, self.prompter)?,
            "16" => sparse::restore_untracked_files(&self.git, self.prompter)?,
            "0" | "exit" => return Ok(Flow::Exit),
            _ => println!("Unrecognized option."),
        }
        Ok(Flow::Continue)
    }

    fn commit_message(&self) -> Result<String> {
        let message = self
            .prompter
            .read_line("Enter the commit message (optional):")?;
        if message.is_empty() {
            return Ok(self.default_commit_message.clone());
        }
        Ok(message)
    }

    fn commit_all_and_push(&self) -> Result<()> {
        let message = self.commit_message()?;
        self.git.add_all()?;

        // Earlier commits may still need pushing when there is nothing new
        match self.git.commit(&message) {
            Ok(output) => print_output(&output),
            Err(e) => eprintln!("{}", e),
        }

        push(&self.git, &self.repo, &self.token)
    }

    fn commit_only(&self) -> Result<()> {
        let message = self.commit_message()?;
        print_output(&self.git.commit(&message)?);
        Ok(())
    }

    fn interactive_add(&self) -> Result<()> {
        let files = self.git.changed_files()?;
        if files.is_empty() {
            println!("No files to add.");
            return Ok(());
        }

        println!("Select files to add (comma separated numbers):");
        print_numbered(&files);
        let input = self.prompter.read_line("")?;
        if input.is_empty() {
            println!("No files selected.");
            return Ok(());
        }

        let selected: Vec<String> = parse_selection(&input, files.len())
            .into_iter()
            .map(|idx| files[idx].clone())
            .collect();
        if selected.is_empty() {
            println!("Invalid selection.");
            return Ok(());
        }

        self.git.add_paths(&selected)?;
        println!("Added selected files.");
        Ok(())
    }

    fn copy_token(&self) -> Result<()> {
        self.clipboard.copy(self.token.expose_secret())?;
        println!("Copied to clipboard ({})!", self.clipboard.name());
        Ok(())
    }

    fn revert_last_push(&self) -> Result<()> {
        let confirmed = self.prompter.confirm(
            "This discards the last commit locally and force-pushes. Are you sure?",
        )?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }

        let remote = self.repo.authenticated_url(&self.token)?;
        print_output(&self.git.reset_last_commit()?);
        print_output(&self.git.push(&remote, true)?);
        Ok(())
    }

    fn remove_repository(&mut self) -> Result<()> {
        match self.store.remove(&self.repo.remote_url)? {
            Removal::Removed => println!("Token for {} removed.", self.repo.remote_url),
            Removal::NotFound => println!("No token found for {}.", self.repo.remote_url),
        }
        Ok(())
    }
}
