//! CLI module for gitmanager
//!
//! This module contains the clap definitions, the interactive menus and the
//! handlers for non-interactive subcommands.

pub mod branch;
pub mod commands;
pub mod config;
pub mod keygen;
pub mod menu;
pub mod sparse;
pub mod tokens;

pub use commands::{Cli, Commands};

use crate::core::prompt::Prompter;
use crate::core::runner::CommandOutput;
use crate::error::{GitManagerError, Result};

/// What a menu does after handling a choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Show `menu` and dispatch choices until `handle` asks to exit
///
/// Recoverable errors are printed and the loop continues; closed input ends
/// the loop normally.
pub(crate) fn run_menu<F>(prompter: &dyn Prompter, menu: &str, mut handle: F) -> Result<()>
where
    F: FnMut(&str) -> Result<Flow>,
{
    loop {
        println!("\n{}", menu);

        let choice = match prompter.read_line("\nSelect an option:") {
            Ok(choice) => choice,
            Err(GitManagerError::Cancelled) => return Ok(()),
            Err(e) => return Err(e),
        };

        match handle(&choice) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e) if e.is_recoverable() => eprintln!("{}", e),
            Err(e) => return Err(e),
        }
    }
}

/// Parse comma separated 1-based indices into 0-based positions
///
/// Non-numeric and out-of-range entries are ignored; duplicates are dropped.
pub(crate) fn parse_selection(input: &str, len: usize) -> Vec<usize> {
    let mut selected = Vec::new();
    for part in input.split(',') {
        let Ok(number) = part.trim().parse::<usize>() else {
            continue;
        };
        if (1..=len).contains(&number) && !selected.contains(&(number - 1)) {
            selected.push(number - 1);
        }
    }
    selected
}

/// Print numbered entries starting at 1
pub(crate) fn print_numbered<S: AsRef<str>>(items: &[S]) {
    for (idx, item) in items.iter().enumerate() {
        println!("{}. {}", idx + 1, item.as_ref());
    }
}

/// Echo whatever a git command printed
pub(crate) fn print_output(output: &CommandOutput) {
    for text in [&output.stdout, &output.stderr] {
        let text = text.trim_end();
        if !text.is_empty() {
            println!("{}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPrompter;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1,3", 3), vec![0, 2]);
        assert_eq!(parse_selection(" 2 , 2, 1", 3), vec![1, 0]);
        assert_eq!(parse_selection("0,4,x,-1,", 3), Vec::<usize>::new());
        assert_eq!(parse_selection("", 3), Vec::<usize>::new());
    }

    #[test]
    fn test_run_menu_exits_on_request() {
        let prompter = ScriptedPrompter::new(vec!["x", "1", "0", "never-read"]);
        let mut seen = Vec::new();

        run_menu(&prompter, "menu", |choice| {
            seen.push(choice.to_string());
            Ok(if choice == "0" { Flow::Exit } else { Flow::Continue })
        })
        .unwrap();

        assert_eq!(seen, vec!["x", "1", "0"]);
        assert_eq!(prompter.remaining(), 1);
    }

    #[test]
    fn test_run_menu_survives_recoverable_errors() {
        let prompter = ScriptedPrompter::new(vec!["1", "2"]);
        let mut calls = 0;

        run_menu(&prompter, "menu", |_| {
            calls += 1;
            Err(GitManagerError::Subprocess("Pull failed: offline".to_string()))
        })
        .unwrap();

        // Input ran out after both choices failed
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_run_menu_stops_on_fatal_errors() {
        let prompter = ScriptedPrompter::new(vec!["1", "2"]);

        let result = run_menu(&prompter, "menu", |_| {
            Err(GitManagerError::Io(std::io::Error::other("disk full")))
        });

        assert!(matches!(result, Err(GitManagerError::Io(_))));
        assert_eq!(prompter.remaining(), 1);
    }
}
