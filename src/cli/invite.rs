//! Invite command - add a recipient.

use tracing::info;

use crate::cli::{output, project_root};
use crate::core::identity;
use crate::core::vault::Vault;
use crate::error::Result;

/// Add a recipient from a public key (text or file).
pub fn execute(name: &str, key: &str, github: Option<&str>) -> Result<()> {
    info!("Inviting {}", name);

    let public_key = identity::read_public_key(key)?;
    let mut vault = Vault::open(project_root()?)?;
    let recipient = vault.invite(name, public_key, github)?;

    output::success(&format!(
        "invited {} ({} {})",
        recipient.name(),
        recipient.public_key().key_type(),
        output::faint(recipient.public_key().fingerprint())
    ));
    output::hint("run: ghost push, so they can decrypt");
    Ok(())
}
