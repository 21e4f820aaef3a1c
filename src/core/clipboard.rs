//! System clipboard access
//!
//! Each backend pipes text into a platform clipboard utility. The backend is
//! chosen once at startup by probing which utilities are installed, rather
//! than by inspecting the operating system name.

use tracing::debug;

use crate::core::runner::CommandRunner;
use crate::error::{GitManagerError, Result};

/// Best-effort copy of text to the system clipboard
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardWriter {
    fn copy(&self, text: &str) -> Result<()>;

    /// Short name shown in status messages
    fn name(&self) -> &'static str;
}

/// A clipboard utility that reads the text from stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// macOS
pub const PBCOPY: ClipboardTool = ClipboardTool {
    program: "pbcopy",
    args: &[],
};

/// Windows
pub const CLIP: ClipboardTool = ClipboardTool {
    program: "clip",
    args: &[],
};

/// Wayland (wl-clipboard)
pub const WL_COPY: ClipboardTool = ClipboardTool {
    program: "wl-copy",
    args: &[],
};

/// X11
pub const XCLIP: ClipboardTool = ClipboardTool {
    program: "xclip",
    args: &["-selection", "clipboard"],
};

/// X11
pub const XSEL: ClipboardTool = ClipboardTool {
    program: "xsel",
    args: &["--clipboard", "--input"],
};

/// Clipboard backed by an external utility
pub struct CommandClipboard<'a> {
    runner: &'a dyn CommandRunner,
    tool: ClipboardTool,
}

impl<'a> CommandClipboard<'a> {
    pub fn new(runner: &'a dyn CommandRunner, tool: ClipboardTool) -> Self {
        Self { runner, tool }
    }
}

impl ClipboardWriter for CommandClipboard<'_> {
    fn copy(&self, text: &str) -> Result<()> {
        let output = self
            .runner
            .run_with_input(self.tool.program, self.tool.args, text.as_bytes())?;

        if !output.success() {
            return Err(GitManagerError::Clipboard(format!(
                "{} exited with status {}: {}",
                self.tool.program,
                output.status_code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.tool.program
    }
}

/// Used when no clipboard utility is installed
pub struct UnavailableClipboard;

impl ClipboardWriter for UnavailableClipboard {
    fn copy(&self, _text: &str) -> Result<()> {
        Err(GitManagerError::Clipboard(
            "No clipboard utility found.\n\n  → Install xclip, xsel or wl-clipboard on Linux."
                .to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Candidate utilities in preference order
///
/// `wl-copy` only qualifies inside a Wayland session.
pub fn candidate_tools(wayland: bool) -> Vec<ClipboardTool> {
    let mut tools = vec![PBCOPY, CLIP];
    if wayland {
        tools.push(WL_COPY);
    }
    tools.extend([XCLIP, XSEL]);
    tools
}

/// Pick the first installed clipboard utility
pub fn detect_clipboard(runner: &dyn CommandRunner) -> Box<dyn ClipboardWriter + '_> {
    let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
    select_clipboard(runner, &candidate_tools(wayland))
}

fn select_clipboard<'a>(
    runner: &'a dyn CommandRunner,
    candidates: &[ClipboardTool],
) -> Box<dyn ClipboardWriter + 'a> {
    match candidates
        .iter()
        .find(|tool| runner.is_available(tool.program))
    {
        Some(tool) => {
            debug!(program = tool.program, "using clipboard utility");
            Box::new(CommandClipboard::new(runner, *tool))
        }
        None => {
            debug!("no clipboard utility available");
            Box::new(UnavailableClipboard)
        }
    }
}
