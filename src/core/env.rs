//! Dotenv file helpers.
//!
//! The env file is encrypted as opaque bytes, so nothing here rewrites it.
//! These helpers only count assignments for feedback and write the restored
//! file with owner-only permissions.

use std::path::Path;

use zeroize::Zeroizing;

use crate::error::{Result, StoreError};

/// Variable names assigned in dotenv text, in file order.
///
/// Blank lines and `#` comments are skipped; an optional `export ` prefix is
/// accepted. Lines without `=` are ignored.
pub fn variable_names(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, _) = line.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then_some(key)
        })
        .collect()
}

/// Number of variable assignments in dotenv text.
pub fn count_variables(contents: &str) -> usize {
    variable_names(contents).len()
}

/// Read an env file.
///
/// # Errors
///
/// `StoreError::FileNotFound` if it does not exist.
pub fn read(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()).into());
    }
    std::fs::read(path).map(Zeroizing::new).map_err(|source| {
        StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

/// Write decrypted env contents, readable only by the owner on Unix.
pub fn write(path: &Path, contents: &[u8]) -> Result<()> {
    let wrap = |source: std::io::Error| StoreError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(0o600)
            .open(path)
            .map_err(wrap)?;
        file.write_all(contents).map_err(wrap)?;
        file.flush().map_err(wrap)?;

        // Ensure secure permissions even when overwriting an existing file.
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(wrap)?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, contents).map_err(wrap)?;
    }

    Ok(())
}
