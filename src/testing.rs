//! Test doubles for the collaborators used by menus and the token store

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::core::prompt::Prompter;
use crate::core::runner::{CommandOutput, CommandRunner};
use crate::error::{GitManagerError, Result};

/// Prompter that answers from a fixed script
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self) -> Result<String> {
        self.answers
            .borrow_mut()
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or(GitManagerError::Cancelled)
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&self, _prompt: &str) -> Result<String> {
        self.next()
    }

    fn read_secret(&self, _prompt: &str) -> Result<String> {
        self.next()
    }
}

/// Command runner that records invocations and replays canned output
///
/// Unscripted commands succeed with empty output. Several responses for the
/// same command are replayed in order, the last one repeating.
#[derive(Default)]
pub struct FakeRunner {
    responses: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    available: Vec<String>,
    calls: RefCell<Vec<Vec<String>>>,
    inputs: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `command` (program and args joined by spaces) with `output`
    pub fn respond(self, command: &str, output: CommandOutput) -> Self {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
        self
    }

    /// Programs reported as installed
    pub fn with_available(mut self, programs: &[&str]) -> Self {
        self.available = programs.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            status_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: &str) -> CommandOutput {
        CommandOutput {
            status_code: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    /// Every command run so far, as space-joined strings
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|call| call.join(" ")).collect()
    }

    /// Arguments of the most recent command, without the program
    pub fn last_args(&self) -> Vec<String> {
        self.calls
            .borrow()
            .last()
            .map(|call| call[1..].to_vec())
            .unwrap_or_default()
    }

    /// Text written to stdin by `run_with_input`
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.borrow().clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> CommandOutput {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|arg| arg.to_string()));
        let key = call.join(" ");
        self.calls.borrow_mut().push(call);

        let mut responses = self.responses.borrow_mut();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => CommandOutput::default(),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        Ok(self.record(program, args))
    }

    fn run_with_input(&self, program: &str, args: &[&str], input: &[u8]) -> Result<CommandOutput> {
        self.inputs
            .borrow_mut()
            .push(String::from_utf8_lossy(input).to_string());
        Ok(self.record(program, args))
    }

    fn is_available(&self, program: &str) -> bool {
        self.available.iter().any(|p| p == program)
    }
}
