//! Untracking files from the working tree with sparse-checkout
//!
//! "Untracked" files stay in the index and history but are removed from the
//! working tree by excluding them from the sparse-checkout patterns.
//! Restoring adds them back; once nothing is excluded sparse-checkout is
//! disabled again.

use crate::cli::{parse_selection, print_numbered};
use crate::core::git::GitCommands;
use crate::core::prompt::Prompter;
use crate::error::Result;

/// Tracked files that are currently checked out
///
/// An empty `included` list means sparse-checkout is off and every file is
/// checked out.
pub fn untrack_candidates(tracked: &[String], included: &[String]) -> Vec<String> {
    if included.is_empty() {
        return tracked.to_vec();
    }
    tracked
        .iter()
        .filter(|file| included.contains(file))
        .cloned()
        .collect()
}

/// Tracked files left out of the sparse-checkout patterns
pub fn excluded_files(tracked: &[String], included: &[String]) -> Vec<String> {
    tracked
        .iter()
        .filter(|file| !included.contains(file))
        .cloned()
        .collect()
}

/// Ask which checked-out files to remove from the working tree
pub fn untrack_files(git: &GitCommands<'_>, prompter: &dyn Prompter) -> Result<()> {
    let tracked = git.tracked_files()?;
    if tracked.is_empty() {
        println!("No tracked files found.");
        return Ok(());
    }

    let mut included = git.sparse_checkout_list()?;
    if included.is_empty() {
        included = tracked.clone();
    }

    let candidates = untrack_candidates(&tracked, &included);
    if candidates.is_empty() {
        println!("No files to untrack.");
        return Ok(());
    }

    println!("Select files to untrack (comma separated numbers):");
    print_numbered(&candidates);
    let input = prompter.read_line("")?;
    if input.is_empty() {
        println!("No files selected.");
        return Ok(());
    }

    let selected: Vec<String> = parse_selection(&input, candidates.len())
        .into_iter()
        .map(|idx| candidates[idx].clone())
        .collect();
    if selected.is_empty() {
        println!("Invalid selection.");
        return Ok(());
    }

    let remaining: Vec<String> = included
        .into_iter()
        .filter(|file| !selected.contains(file))
        .collect();
    git.sparse_checkout_set(&remaining)?;

    println!("Files untracked: {}", selected.join(", "));
    Ok(())
}

/// Ask which excluded files to bring back into the working tree
pub fn restore_untracked_files(git: &GitCommands<'_>, prompter: &dyn Prompter) -> Result<()> {
    let tracked = git.tracked_files()?;
    if tracked.is_empty() {
        println!("No tracked files found.");
        return Ok(());
    }

    let included = git.sparse_checkout_list()?;
    let excluded = excluded_files(&tracked, &included);
    if included.is_empty() || excluded.is_empty() {
        println!("No files currently untracked.");
        return Ok(());
    }

    println!("Select files to restore:");
    println!("0. Back");
    print_numbered(&excluded);
    let restore_all = excluded.len() + 1;
    println!("{}. Restore all", restore_all);

    let input = prompter.read_line("")?;
    if input == "0" || input.eq_ignore_ascii_case("back") {
        println!("Returning to main menu.");
        return Ok(());
    }

    let selected: Vec<String> = if input == restore_all.to_string() {
        excluded.clone()
    } else {
        parse_selection(&input, excluded.len())
            .into_iter()
            .map(|idx| excluded[idx].clone())
            .collect()
    };
    if selected.is_empty() {
        println!("Invalid selection.");
        return Ok(());
    }

    let mut patterns = included.clone();
    patterns.extend(selected.iter().filter(|file| !included.contains(file)).cloned());
    git.sparse_checkout_set(&patterns)?;

    if selected.len() == excluded.len() {
        println!("All files restored.");
    } else {
        println!("Files restored: {}", selected.join(", "));
    }

    let still_excluded = excluded_files(&tracked, &git.sparse_checkout_list()?);
    if still_excluded.is_empty() {
        git.sparse_checkout_disable()?;
        println!("sparse-checkout disabled (no more untracked files).");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRunner, ScriptedPrompter};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidates_without_sparse_checkout() {
        let tracked = strings(&["a", "b"]);
        assert_eq!(untrack_candidates(&tracked, &[]), tracked);
        assert_eq!(untrack_candidates(&tracked, &strings(&["b"])), strings(&["b"]));
    }

    #[test]
    fn test_excluded_files() {
        let tracked = strings(&["a", "b", "c"]);
        assert_eq!(excluded_files(&tracked, &strings(&["a"])), strings(&["b", "c"]));
    }

    #[test]
    fn test_untrack_selected_files() {
        let runner = FakeRunner::new()
            .respond("git ls-files", FakeRunner::ok("README.md\nsecret.env\nsrc/lib.rs\n"))
            .respond(
                "git sparse-checkout list",
                FakeRunner::failed("fatal: this worktree is not sparse"),
            );
        let git = GitCommands::new(&runner);
        let prompter = ScriptedPrompter::new(vec!["2"]);

        untrack_files(&git, &prompter).unwrap();

        assert!(runner
            .calls()
            .contains(&"git sparse-checkout set --no-cone README.md src/lib.rs".to_string()));
        assert_eq!(runner.calls().last().map(String::as_str), Some("git checkout"));
    }

    #[test]
    fn test_untrack_invalid_selection_changes_nothing() {
        let runner = FakeRunner::new().respond("git ls-files", FakeRunner::ok("a\nb\n"));
        let git = GitCommands::new(&runner);
        let prompter = ScriptedPrompter::new(vec!["7"]);

        untrack_files(&git, &prompter).unwrap();

        assert_eq!(
            runner.calls(),
            vec!["git ls-files", "git sparse-checkout list"]
        );
    }

    #[test]
    fn test_restore_nothing_untracked() {
        let runner = FakeRunner::new().respond("git ls-files", FakeRunner::ok("a\nb\n"));
        let git = GitCommands::new(&runner);
        let prompter = ScriptedPrompter::new(vec!["1"]);

        restore_untracked_files(&git, &prompter).unwrap();

        assert_eq!(prompter.remaining(), 1);
    }

    #[test]
    fn test_restore_one_file_keeps_sparse_checkout() {
        let runner = FakeRunner::new()
            .respond("git ls-files", FakeRunner::ok("a\nb\nc\n"))
            .respond("git sparse-checkout list", FakeRunner::ok("a\n"));
        let git = GitCommands::new(&runner);
        let prompter = ScriptedPrompter::new(vec!["2"]);

        restore_untracked_files(&git, &prompter).unwrap();

        let calls = runner.calls();
        assert!(calls.contains(&"git sparse-checkout set --no-cone a c".to_string()));
        assert!(!calls.contains(&"git sparse-checkout disable".to_string()));
    }

    #[test]
    fn test_restore_all_disables_sparse_checkout() {
        let runner = FakeRunner::new()
            .respond("git ls-files", FakeRunner::ok("a\nb\nc\n"))
            .respond("git sparse-checkout list", FakeRunner::ok("a\n"))
            .respond("git sparse-checkout list", FakeRunner::ok("a\nb\nc\n"));
        let git = GitCommands::new(&runner);
        // b and c are excluded, so option 3 restores both
        let prompter = ScriptedPrompter::new(vec!["3"]);

        restore_untracked_files(&git, &prompter).unwrap();

        let calls = runner.calls();
        assert!(calls.contains(&"git sparse-checkout set --no-cone a b c".to_string()));
        assert_eq!(calls.last().map(String::as_str), Some("git sparse-checkout disable"));
    }

    #[test]
    fn test_restore_back() {
        let runner = FakeRunner::new()
            .respond("git ls-files", FakeRunner::ok("a\nb\n"))
            .respond("git sparse-checkout list", FakeRunner::ok("a\n"));
        let git = GitCommands::new(&runner);
        let prompter = ScriptedPrompter::new(vec!["back"]);

        restore_untracked_files(&git, &prompter).unwrap();

        assert_eq!(
            runner.calls(),
            vec!["git ls-files", "git sparse-checkout list"]
        );
    }
}
