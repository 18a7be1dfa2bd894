//! Inspect command - envelope metadata without decrypting.

use crate::cli::{output, project_root};
use crate::core::identity;
use crate::core::vault::Vault;
use crate::error::Result;

/// Show envelope metadata and whether the given key is a recipient.
pub fn execute(key: Option<&str>) -> Result<()> {
    let vault = Vault::open(project_root()?)?;

    let public_key = match key {
        Some(key) => Some(identity::read_public_key(key)?),
        None => identity::default_public_key()
            .and_then(|p| identity::read_public_key(&p.display().to_string()).ok()),
    };
    let fingerprint = public_key.as_ref().map(|k| k.fingerprint());

    let report = vault.inspect(fingerprint.as_ref())?;

    output::header(&vault.config().settings.output_file);
    output::rule();
    output::kv("version", &report.version);
    output::kv("cipher", &report.cipher);
    output::kv("created", report.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    output::kv("size", format!("{} bytes", report.ciphertext_len));
    output::kv("recipients", report.recipients.len());
    for entry in &report.recipients {
        let who = entry.name.as_deref().unwrap_or("(no longer registered)");
        output::list_item(&format!("{} {}", who, output::faint(&entry.fingerprint)));
    }

    if let (Some(fp), Some(is_recipient)) = (&fingerprint, report.is_recipient) {
        output::blank();
        if is_recipient {
            output::success(&format!("you ({}) can decrypt this envelope", fp.short()));
        } else {
            output::warn(&format!("you ({}) are not a recipient", fp.short()));
            output::hint("ask a teammate to run: ghost invite <you> --key <pubkey> && ghost push");
        }
    }

    if report.is_stale() {
        output::blank();
        for name in &report.pending {
            output::warn(&format!("{} is registered but not in the envelope", name));
        }
        if report.revoked() > 0 {
            output::warn(&format!(
                "{} can still decrypt",
                output::plural(report.revoked(), "removed recipient")
            ));
        }
        output::hint("run: ghost push");
    }

    Ok(())
}
