//! Ghost - share .env secrets through git, encrypted for every teammate.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ghost::cli::output;
use ghost::cli::{execute, Cli};
use ghost::error::{CipherError, ConfigError, DecryptionError, Error, GitError, KeyError, StoreError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("GHOST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("ghost=debug")
        } else {
            EnvFilter::new("ghost=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Follow-up advice for errors the user can act on.
fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::NotInitialized) => Some("run: ghost init"),
        Error::Config(ConfigError::AlreadyInitialized) => {
            Some("add teammates with: ghost invite <name> --key <pubkey>")
        }
        Error::Git(GitError::NotARepository) => Some("run: git init"),
        Error::Git(GitError::ForeignHook(_)) => {
            Some("merge the check into your hook by hand, or remove it first")
        }
        Error::Cipher(CipherError::NoRecipients) => {
            Some("run: ghost invite <name> --key <pubkey>")
        }
        Error::Cipher(CipherError::Decryption(DecryptionError::RecipientNotFound(_))) => Some(
            "not a recipient: ask a teammate to run `ghost invite` and `ghost push`",
        ),
        Error::Cipher(CipherError::Decryption(DecryptionError::IntegrityCheckFailed)) => {
            Some("the envelope or key is damaged: restore .env.ghost from git or re-push")
        }
        Error::Cipher(CipherError::UnsupportedFormat { .. }) => {
            Some("this envelope was written by a different ghost version")
        }
        Error::Key(KeyError::PassphraseRequired) => {
            Some("set GHOST_PASSPHRASE or run ghost pull from a terminal")
        }
        Error::Store(StoreError::NoPrivateKey(_)) => Some("pass your key with: ghost pull --key <path>"),
        _ => None,
    }
}
