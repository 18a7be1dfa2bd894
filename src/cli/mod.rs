//! Command-line interface.

pub mod completions;
pub mod hook;
pub mod init;
pub mod inspect;
pub mod invite;
pub mod list;
pub mod output;
pub mod pull;
pub mod push;
pub mod remove;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::git;
use crate::error::Result;

/// Ghost - share .env secrets through git, encrypted for every teammate.
#[derive(Parser)]
#[command(
    name = "ghost",
    about = "Share .env secrets through git, encrypted for every teammate",
    version,
    after_help = "Secrets stay out of the repo. Only ghosts get committed. 👻"
)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize ghost in the current git repository
    Init {
        /// Your name (defaults to the OS user)
        #[arg(short, long)]
        name: Option<String>,
        /// Your public key, as text or a path (defaults to ~/.ssh/id_ed25519.pub)
        #[arg(short, long, value_name = "PUBKEY_OR_FILE")]
        key: Option<String>,
    },

    /// Add a recipient who can decrypt the secrets
    Invite {
        /// Display name
        name: String,
        /// Public key, as text or a path to a .pub file
        #[arg(short, long, value_name = "PUBKEY_OR_FILE")]
        key: String,
        /// GitHub handle, recorded for reference
        #[arg(long, value_name = "HANDLE")]
        github: Option<String>,
    },

    /// Remove a recipient by name or GitHub handle
    #[command(alias = "rm")]
    Remove {
        /// Name or @handle
        target: String,
    },

    /// List recipients
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encrypt .env for all recipients into .env.ghost
    Push {
        /// Don't stage the envelope with git
        #[arg(long)]
        no_add: bool,
    },

    /// Decrypt .env.ghost into .env with your private key
    Pull {
        /// Private key file (defaults to ~/.ssh/id_ed25519, then ~/.ssh/id_rsa)
        #[arg(short, long, value_name = "PATH")]
        key: Option<PathBuf>,
    },

    /// Show envelope metadata without decrypting
    Inspect {
        /// Key to check membership for (public or private key file)
        #[arg(short, long, value_name = "PATH")]
        key: Option<String>,
    },

    /// Manage the git pre-commit hook
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Hook subcommands.
#[derive(Subcommand)]
pub enum HookAction {
    /// Install a pre-commit hook that blocks committing .env without .env.ghost
    Install,
    /// Remove the pre-commit hook installed by ghost
    Uninstall,
}

/// Execute a command.
pub fn execute(command: Command) -> Result<()> {
    use Command::*;

    match command {
        Init { name, key } => init::execute(name, key),
        Invite { name, key, github } => invite::execute(&name, &key, github.as_deref()),
        Remove { target } => remove::execute(&target),
        List { json } => list::execute(json),
        Push { no_add } => push::execute(no_add),
        Pull { key } => pull::execute(key),
        Inspect { key } => inspect::execute(key.as_deref()),
        Hook { action } => match action {
            HookAction::Install => hook::install(),
            HookAction::Uninstall => hook::uninstall(),
        },
        Completions { shell } => completions::execute(shell),
    }
}

/// Directory holding `ghost.toml`.
///
/// The current directory when it has one, otherwise the top of the
/// enclosing git work tree.
pub(crate) fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    if Config::exists(&cwd) {
        return Ok(cwd);
    }
    match git::repo_root(&cwd) {
        Ok(root) if Config::exists(&root) => Ok(root),
        _ => Ok(cwd),
    }
}
