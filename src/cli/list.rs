//! List command.

use crate::cli::{output, project_root};
use crate::core::vault::Vault;
use crate::error::Result;

/// List recipients in the order they were added.
pub fn execute(json: bool) -> Result<()> {
    let vault = Vault::open(project_root()?)?;
    let recipients = vault.recipients();

    if json {
        let entries: Vec<_> = recipients
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name(),
                    "github": r.github(),
                    "key_type": r.public_key().key_type().tag(),
                    "fingerprint": r.public_key().fingerprint().as_str(),
                    "public_key": r.public_key().as_str(),
                    "added_at": r.added_at().to_rfc3339(),
                })
            })
            .collect();

        let result = serde_json::json!({
            "recipients": entries,
            "count": recipients.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if recipients.is_empty() {
        output::dimmed("no recipients");
        output::hint("run: ghost invite <name> --key <pubkey>");
        return Ok(());
    }

    output::header(&output::plural(recipients.len(), "recipient"));
    output::rule();
    for r in recipients {
        let handle = r
            .github()
            .map(|h| format!(" @{}", h))
            .unwrap_or_default();
        output::kv(
            &format!("{}{}", r.name(), handle),
            format!(
                "{} {}",
                r.public_key().key_type(),
                output::faint(r.public_key().fingerprint())
            ),
        );
    }

    Ok(())
}
