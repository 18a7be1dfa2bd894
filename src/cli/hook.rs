//! Hook command - manage the git pre-commit hook.

use crate::cli::{output, project_root};
use crate::core::git::{self, HookInstall};
use crate::core::vault::Vault;
use crate::error::Result;

/// Install the pre-commit hook for this project's env and envelope files.
pub fn install() -> Result<()> {
    let vault = Vault::open(project_root()?)?;
    let settings = &vault.config().settings;

    match git::install_hook(vault.root(), &settings.env_file, &settings.output_file)? {
        HookInstall::Installed => output::success("installed pre-commit hook"),
        HookInstall::Replaced => output::success("updated pre-commit hook"),
    }
    output::dimmed(&format!(
        "  commits staging {} without {} will be refused",
        settings.env_file, settings.output_file
    ));
    Ok(())
}

/// Remove the pre-commit hook if ghost installed it.
pub fn uninstall() -> Result<()> {
    let root = project_root()?;
    if git::uninstall_hook(&root)? {
        output::success("removed pre-commit hook");
    } else {
        output::dimmed("no pre-commit hook installed");
    }
    Ok(())
}
