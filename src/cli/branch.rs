//! Branch management sub-menu

use crate::cli::{print_output, run_menu, Flow};
use crate::core::git::GitCommands;
use crate::core::prompt::Prompter;
use crate::error::{GitManagerError, Result};

const BRANCH_MENU: &str = "\
Branch Management:
1. List branches
2. Create branch
3. Delete branch
4. Switch branch
5. Merge branch
0. Back";

/// Run the branch menu until the user goes back
pub fn run_branch_menu(git: &GitCommands<'_>, prompter: &dyn Prompter) -> Result<()> {
    run_menu(prompter, BRANCH_MENU, |choice| handle_branch(git, prompter, choice))
}

/// Handle a single branch menu choice
pub fn handle_branch(git: &GitCommands<'_>, prompter: &dyn Prompter, choice: &str) -> Result<Flow> {
    match choice {
        "1" => println!("{}", git.list_branches()?.trim_end()),
        "2" => {
            let name = branch_name(prompter, "Enter new branch name:")?;
            print_output(&git.create_branch(&name)?);
            println!("✓ Created branch '{}'", name);
        }
        "3" => {
            let name = branch_name(prompter, "Enter branch name to delete:")?;
            print_output(&git.delete_branch(&name)?);
        }
        "4" => {
            let name = branch_name(prompter, "Enter branch name to switch to:")?;
            print_output(&git.checkout(&name)?);
        }
        "5" => {
            let name = branch_name(prompter, "Enter branch name to merge into current:")?;
            print_output(&git.merge(&name)?);
        }
        "0" => return Ok(Flow::Exit),
        _ => println!("Unrecognized option."),
    }
    Ok(Flow::Continue)
}

fn branch_name(prompter: &dyn Prompter, prompt: &str) -> Result<String> {
    let name = prompter.read_line(prompt)?;
    if name.is_empty() {
        return Err(GitManagerError::InvalidInput(
            "Branch name cannot be empty.".to_string(),
        ));
    }
    Ok(name)
}
