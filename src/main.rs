//! gitmanager - interactive git helper
//!
//! Run inside a repository to open the git menu, or anywhere else to manage
//! stored tokens. `--pull` and `--push` run a single operation and exit.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gitmanager::cli::menu::{self, Session};
use gitmanager::cli::tokens::TokenMenu;
use gitmanager::cli::{config, keygen, Cli, Commands};
use gitmanager::core::clipboard::detect_clipboard;
use gitmanager::core::config::Config;
use gitmanager::core::git::GitCommands;
use gitmanager::core::key::resolve_key;
use gitmanager::core::prompt::TerminalPrompter;
use gitmanager::core::repository::RepositoryContext;
use gitmanager::core::runner::SystemCommandRunner;
use gitmanager::core::token_store::TokenStore;
use gitmanager::error::{GitManagerError, Result};

fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.token_file, cli.key_env);

    let runner = SystemCommandRunner;
    let clipboard = detect_clipboard(&runner);
    let prompter = TerminalPrompter;

    match cli.command {
        // Subcommands never touch the token file, so no key is needed
        Some(Commands::Keygen) => {
            let shell = std::env::var("SHELL").ok();
            return keygen::handle_keygen(
                &config.key_env,
                shell.as_deref(),
                clipboard.as_ref(),
                &prompter,
            );
        }
        Some(Commands::Config(args)) => return config::handle_config(args.command, &config),
        None => {}
    }

    let key = resolve_key(&config.key_env, &prompter)?;
    let mut store = TokenStore::open(config.token_path()?, key);
    debug!(path = %store.path().display(), tokens = store.len(), "opened token store");

    let git = GitCommands::new(&runner);
    let Some(repo) = RepositoryContext::detect(&git)? else {
        if cli.pull || cli.push {
            return Err(GitManagerError::NoRepository);
        }
        return TokenMenu::new(&mut store, &prompter, clipboard.as_ref()).run();
    };

    println!("Repository URL detected: {}", repo.remote_url);
    let token = store.get_or_prompt(&repo.remote_url, &prompter)?;

    if cli.push {
        return menu::push(&git, &repo, &token);
    }
    if cli.pull {
        return menu::pull(&git, &repo, &token);
    }

    Session {
        store: &mut store,
        git,
        prompter: &prompter,
        clipboard: clipboard.as_ref(),
        repo,
        token,
        default_commit_message: config.default_commit_message.clone(),
    }
    .run()
}
