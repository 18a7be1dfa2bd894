//! Shell completion scripts.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::Result;

/// Print the completion script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    render(shell, &mut std::io::stdout().lock())
}

fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut command = Cli::command();
    let bin = command.get_name().to_string();
    generate(shell, &mut command, bin, out);
    Ok(())
}
