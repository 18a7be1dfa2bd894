//! Init command - initialize ghost in a git repository.

use tracing::info;

use crate::cli::output;
use crate::core::constants;
use crate::core::identity;
use crate::core::vault::Vault;
use crate::error::Result;

/// Initialize ghost in the current directory.
///
/// Registers the caller as the first recipient when a public key is given
/// or found next to a default SSH key.
pub fn execute(name: Option<String>, key: Option<String>) -> Result<()> {
    let root = std::env::current_dir()?;
    let mut vault = Vault::init(&root)?;
    output::success(&format!("created {}", constants::CONFIG_FILE));
    output::success("updated .gitignore");

    let key = match key {
        Some(key) => Some(key),
        None => identity::default_public_key().map(|p| p.display().to_string()),
    };

    match key {
        Some(key) => {
            let name = name.unwrap_or_else(whoami::username);
            info!("Registering {} as the first recipient", name);

            let public_key = identity::read_public_key(&key)?;
            let recipient = vault.invite(&name, public_key, None)?;
            output::success(&format!(
                "added {} ({} {})",
                recipient.name(),
                recipient.public_key().key_type(),
                output::faint(recipient.public_key().fingerprint().short())
            ));
        }
        None => {
            output::warn("no public key found, nobody can decrypt yet");
            output::hint("run: ghost invite <name> --key ~/.ssh/id_ed25519.pub");
        }
    }

    output::blank();
    output::header("Next steps:");
    output::list_item(&format!("add teammates: {}", output::cmd("ghost invite <name> --key <pubkey>")));
    output::list_item(&format!("encrypt .env:  {}", output::cmd("ghost push")));
    output::list_item(&format!("guard commits: {}", output::cmd("ghost hook install")));

    Ok(())
}
