//! `gitmanager keygen` - generate a new encryption key

use zeroize::Zeroizing;

use crate::core::clipboard::ClipboardWriter;
use crate::core::key::Key;
use crate::core::prompt::Prompter;
use crate::error::{GitManagerError, Result};

/// Generate a key, copy it to the clipboard and explain how to export it
///
/// Clipboard failures are reported but do not fail the command.
pub fn handle_keygen(
    key_env: &str,
    shell: Option<&str>,
    clipboard: &dyn ClipboardWriter,
    prompter: &dyn Prompter,
) -> Result<()> {
    let key = Key::generate();
    let encoded = Zeroizing::new(key.to_base64());

    println!("\nYour new encryption key (base64, 32 bytes) is:\n");
    println!("{}", encoded.as_str());
    println!("\nSave this key carefully! You will need it to decrypt your tokens.\n");

    match clipboard.copy(&encoded) {
        Ok(()) => println!("✓ The key has been copied to your clipboard.\n"),
        Err(e) => eprintln!("{}\n", e),
    }

    let export = export_line(key_env, &encoded);
    println!(
        "To set this key as an environment variable, run:\n\n{}\n",
        export
    );

    let wants_profile = match prompter
        .confirm("Do you want to print the command to save it in your shell profile?")
    {
        Ok(answer) => answer,
        Err(GitManagerError::Cancelled) => false,
        Err(e) => return Err(e),
    };
    if wants_profile {
        let profile = profile_file_for_shell(shell.unwrap_or_default());
        println!("\nAdd the following line to your shell profile ({}):\n", profile);
        println!("{}", export);
        println!("\nYou can add it manually or run:");
        println!("echo '{}' >> {}", export, profile);
        println!("Then reload your shell or source the profile file.\n");
    }

    Ok(())
}

/// Shell command that exports the key
pub fn export_line(key_env: &str, key: &str) -> String {
    format!("export {}=\"{}\"", key_env, key)
}

/// Profile file conventionally sourced by the shell in `$SHELL`
pub fn profile_file_for_shell(shell: &str) -> &'static str {
    if shell.contains("bash") {
        "~/.bashrc"
    } else if shell.contains("zsh") {
        "~/.zshrc"
    } else if shell.contains("fish") {
        "~/.config/fish/config.fish"
    } else {
        "~/.profile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clipboard::MockClipboardWriter;
    use crate::core::key::derive_key;
    use crate::testing::ScriptedPrompter;

    #[test]
    fn test_profile_file_for_shell() {
        assert_eq!(profile_file_for_shell("/bin/bash"), "~/.bashrc");
        assert_eq!(profile_file_for_shell("/usr/bin/zsh"), "~/.zshrc");
        assert_eq!(
            profile_file_for_shell("/opt/homebrew/bin/fish"),
            "~/.config/fish/config.fish"
        );
        assert_eq!(profile_file_for_shell("/bin/sh"), "~/.profile");
        assert_eq!(profile_file_for_shell(""), "~/.profile");
    }

    #[test]
    fn test_export_line() {
        assert_eq!(
            export_line("GITMANAGER_KEY", "abc="),
            "export GITMANAGER_KEY=\"abc=\""
        );
    }

    #[test]
    fn test_copies_a_valid_key() {
        let mut clipboard = MockClipboardWriter::new();
        clipboard
            .expect_copy()
            .withf(|text: &str| derive_key(text).is_ok())
            .times(1)
            .returning(|_| Ok(()));
        let prompter = ScriptedPrompter::new(vec!["n"]);

        handle_keygen("GITMANAGER_KEY", Some("/bin/zsh"), &clipboard, &prompter).unwrap();
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_clipboard_failure_is_not_fatal() {
        let mut clipboard = MockClipboardWriter::new();
        clipboard
            .expect_copy()
            .returning(|_| Err(GitManagerError::Clipboard("no utility".to_string())));
        let prompter = ScriptedPrompter::new(Vec::<String>::new());

        assert!(handle_keygen("GITMANAGER_KEY", None, &clipboard, &prompter).is_ok());
    }
}
