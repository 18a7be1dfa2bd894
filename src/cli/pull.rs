//! Pull command - decrypt the envelope into .env.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{output, project_root};
use crate::core::constants::PASSPHRASE_ENV;
use crate::core::identity;
use crate::core::keys::PrivateKey;
use crate::core::vault::Vault;
use crate::error::{KeyError, Result};

/// Decrypt the envelope with a local private key and write the env file.
pub fn execute(key: Option<PathBuf>) -> Result<()> {
    let vault = Vault::open(project_root()?)?;
    let private_key = load_key(key)?;

    let report = vault.pull(&private_key)?;

    output::success(&format!(
        "decrypted {} → {}",
        output::plural(report.variables, "variable"),
        output::path(&vault.config().settings.env_file)
    ));
    output::dimmed(&format!(
        "  envelope created {}",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    Ok(())
}

/// Load the private key, asking for a passphrase only when the key needs one.
fn load_key(path: Option<PathBuf>) -> Result<PrivateKey> {
    let path = identity::locate_private_key(path.as_deref())?;
    debug!(path = %path.display(), "using private key");

    identity::load_private_key_with(&path, read_passphrase)
}

fn read_passphrase(path: &Path) -> Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
        return Ok(Zeroizing::new(value));
    }
    if !io::stdin().is_terminal() {
        return Err(KeyError::PassphraseRequired.into());
    }

    let passphrase = Password::new()
        .with_prompt(format!("Passphrase for {}", path.display()))
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(Zeroizing::new(passphrase))
}
