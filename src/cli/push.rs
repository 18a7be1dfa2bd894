//! Push command - encrypt .env into the envelope.

use crate::cli::{output, project_root};
use crate::core::vault::Vault;
use crate::error::Result;

/// Encrypt the env file for every recipient and stage the envelope.
pub fn execute(no_add: bool) -> Result<()> {
    let vault = Vault::open(project_root()?)?;
    let report = vault.push()?;

    let relative = vault.config().settings.output_file.clone();
    output::success(&format!(
        "encrypted {} for {} → {}",
        output::plural(report.variables, "variable"),
        output::plural(report.recipients, "recipient"),
        output::path(&relative)
    ));

    if no_add {
        return Ok(());
    }

    match vault.stage_output() {
        Ok(()) => output::success(&format!("staged {}", output::path(&relative))),
        Err(e) => {
            output::warn(&format!("could not stage {}: {}", relative, e));
            output::hint(&format!("run: git add {}", relative));
        }
    }

    Ok(())
}
