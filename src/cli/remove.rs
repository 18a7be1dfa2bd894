//! Remove command - remove a recipient.

use crate::cli::{output, project_root};
use crate::core::vault::Vault;
use crate::error::Result;

/// Remove the first recipient matching a name or handle.
pub fn execute(target: &str) -> Result<()> {
    let mut vault = Vault::open(project_root()?)?;
    let removed = vault.remove(target)?;

    output::success(&format!("removed {}", removed.name()));
    if vault.output_path().exists() {
        output::warn(&format!(
            "{} can still decrypt the current envelope",
            removed.name()
        ));
        output::hint("run: ghost push, and rotate any secrets they had access to");
    }
    Ok(())
}
