//! Git integration.
//!
//! Thin wrappers over the `git` executable: repository detection, staging
//! the envelope, and the pre-commit hook that keeps `.env` and its envelope
//! in step.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::core::constants::HOOK_MARKER;
use crate::error::{GitError, Result};

/// Outcome of installing the pre-commit hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookInstall {
    Installed,
    Replaced,
}

fn git_binary() -> Result<PathBuf> {
    which::which("git").map_err(|_| GitError::NotInstalled.into())
}

/// Whether a `git` executable is on PATH.
pub fn is_installed() -> bool {
    git_binary().is_ok()
}

fn run(dir: &Path, args: &[&str]) -> Result<String> {
    let git = git_binary()?;
    trace!(args = ?args, "running git");

    let output = Command::new(git)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: args.first().copied().unwrap_or_default().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Whether `dir` is inside a git work tree.
pub fn is_repo(dir: &Path) -> bool {
    run(dir, &["rev-parse", "--is-inside-work-tree"])
        .map(|out| out == "true")
        .unwrap_or(false)
}

/// Top-level directory of the work tree containing `dir`.
///
/// # Errors
///
/// `GitError::NotInstalled` without git, `GitError::NotARepository` outside a repository.
pub fn repo_root(dir: &Path) -> Result<PathBuf> {
    git_binary()?;
    run(dir, &["rev-parse", "--show-toplevel"])
        .map(PathBuf::from)
        .map_err(|_| GitError::NotARepository.into())
}

/// Fail unless `dir` is inside a git work tree.
pub fn ensure_repo(dir: &Path) -> Result<()> {
    git_binary()?;
    if !is_repo(dir) {
        return Err(GitError::NotARepository.into());
    }
    Ok(())
}

/// Stage `file` for the next commit.
pub fn stage(dir: &Path, file: &Path) -> Result<()> {
    let file = file.to_string_lossy();
    run(dir, &["add", "--", &file])?;
    debug!(file = %file, "staged");
    Ok(())
}

/// Path of the pre-commit hook for the repository containing `dir`.
pub fn hook_path(dir: &Path) -> Result<PathBuf> {
    git_binary()?;
    let relative = run(dir, &["rev-parse", "--git-path", "hooks/pre-commit"])
        .map_err(|_| GitError::NotARepository)?;
    Ok(dir.join(relative))
}

/// Pre-commit hook script refusing commits that stage `env_file` without
/// `output_file`.
pub fn hook_script(env_file: &str, output_file: &str) -> String {
    format!(
        r#"#!/bin/sh
{marker}
# Refuses commits that change the env file without updating the envelope.

env_file={env}
out_file={out}
staged=$(git diff --cached --name-only)

if printf '%s\n' "$staged" | grep -qxF -- "$env_file"; then
  if ! printf '%s\n' "$staged" | grep -qxF -- "$out_file"; then
    echo "ghost: $env_file is staged but $out_file was not updated" >&2
    echo "  run 'ghost push' and stage $out_file," >&2
    echo "  or unstage $env_file: git restore --staged $env_file" >&2
    exit 1
  fi
fi

exit 0
"#,
        marker = HOOK_MARKER,
        env = shell_quote(env_file),
        out = shell_quote(output_file),
    )
}

/// Single-quote `value` for POSIX sh.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn is_ghost_hook(contents: &str) -> bool {
    contents.lines().any(|line| line.trim() == HOOK_MARKER)
}

/// Install the pre-commit hook.
///
/// An existing ghost hook is replaced; any other hook is left untouched.
///
/// # Errors
///
/// `GitError::ForeignHook` if a hook not written by ghost is present.
pub fn install_hook(dir: &Path, env_file: &str, output_file: &str) -> Result<HookInstall> {
    let path = hook_path(dir)?;

    let outcome = if path.exists() {
        let existing = fs::read_to_string(&path).unwrap_or_default();
        if !is_ghost_hook(&existing) {
            return Err(GitError::ForeignHook(path.display().to_string()).into());
        }
        HookInstall::Replaced
    } else {
        HookInstall::Installed
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, hook_script(env_file, output_file))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }

    debug!(path = %path.display(), ?outcome, "hook installed");
    Ok(outcome)
}

/// Remove the pre-commit hook if ghost installed it.
///
/// Returns `false` when there was no hook to remove.
///
/// # Errors
///
/// `GitError::ForeignHook` if the hook present was not written by ghost.
pub fn uninstall_hook(dir: &Path) -> Result<bool> {
    let path = hook_path(dir)?;
    if !path.exists() {
        return Ok(false);
    }

    let existing = fs::read_to_string(&path)?;
    if !is_ghost_hook(&existing) {
        return Err(GitError::ForeignHook(path.display().to_string()).into());
    }

    fs::remove_file(&path)?;
    debug!(path = %path.display(), "hook removed");
    Ok(true)
}
