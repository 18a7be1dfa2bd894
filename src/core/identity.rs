//! Local key storage.
//!
//! Reads private keys from disk for decryption and public keys (inline text
//! or `.pub` files) for registering recipients. Nothing here ever writes key
//! material.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::keys::{self, PrivateKey, PublicKey};
use crate::error::{Error, KeyError, Result, StoreError};

/// Home directory used to find default keys.
fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| StoreError::NoPrivateKey("unable to determine home directory".into()).into())
}

/// Default private key paths under `home`, in search order.
pub fn default_key_paths(home: &Path) -> Vec<PathBuf> {
    constants::DEFAULT_KEY_PATHS
        .iter()
        .map(|relative| home.join(relative))
        .collect()
}

/// Resolve which private key file to use.
///
/// An explicit path must exist. Otherwise the first existing default key
/// under the home directory is used.
///
/// # Errors
///
/// `StoreError::FileNotFound` for a missing explicit path,
/// `StoreError::NoPrivateKey` when no default key exists.
pub fn locate_private_key(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.display().to_string()).into());
        }
        return Ok(path.to_path_buf());
    }

    let candidates = default_key_paths(&home_dir()?);
    candidates
        .iter()
        .find(|path| path.exists())
        .cloned()
        .ok_or_else(|| {
            let searched = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            StoreError::NoPrivateKey(searched).into()
        })
}

/// Public key file next to the first existing default private key.
pub fn default_public_key() -> Option<PathBuf> {
    let home = home_dir().ok()?;
    default_key_paths(&home)
        .into_iter()
        .map(|path| path.with_extension("pub"))
        .find(|path| path.exists())
}

/// Load and parse a private key file.
///
/// # Errors
///
/// `StoreError::ReadFailed` if the file cannot be read, otherwise any
/// `KeyError` from parsing (including `PassphraseRequired`).
pub fn load_private_key(path: &Path, passphrase: Option<&str>) -> Result<PrivateKey> {
    let contents = read_private_key_file(path)?;
    let key = keys::parse_private_key(&contents, passphrase)?;
    debug!(fingerprint = %key.fingerprint().short(), "private key loaded");
    Ok(key)
}

/// Load a private key, calling `passphrase` only if the key is protected.
///
/// The file is read once. An unprotected key never triggers the callback.
///
/// # Errors
///
/// Same as [`load_private_key`], plus anything `passphrase` returns.
pub fn load_private_key_with<F>(path: &Path, passphrase: F) -> Result<PrivateKey>
where
    F: FnOnce(&Path) -> Result<Zeroizing<String>>,
{
    let contents = read_private_key_file(path)?;

    let key = match keys::parse_private_key(&contents, None) {
        Err(Error::Key(KeyError::PassphraseRequired)) => {
            debug!(path = %path.display(), "key is passphrase-protected");
            let secret = passphrase(path)?;
            keys::parse_private_key(&contents, Some(secret.as_str()))?
        }
        other => other?,
    };

    debug!(fingerprint = %key.fingerprint().short(), "private key loaded");
    Ok(key)
}

fn read_private_key_file(path: &Path) -> Result<Zeroizing<String>> {
    debug!(path = %path.display(), "loading private key");

    #[cfg(unix)]
    {
        if validate_file_permissions(path, 0o600).is_err() {
            let mode = fs::metadata(path)
                .map(|m| {
                    use std::os::unix::fs::PermissionsExt;
                    format!("{:o}", m.permissions().mode() & 0o777)
                })
                .unwrap_or_else(|_| "unknown".to_string());

            warn!(
                path = %path.display(),
                mode = %mode,
                "insecure key file permissions"
            );
        }
    }

    fs::read_to_string(path)
        .map(Zeroizing::new)
        .map_err(|source| {
            StoreError::ReadFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
}

/// Read a public key given either its text or a path to a file holding it.
///
/// Values that look like key text are parsed directly; anything else is
/// treated as a path. A `.pub`-style file yields its first key line, a
/// private key file yields its public half (no passphrase needed).
///
/// # Errors
///
/// `StoreError::FileNotFound` if the value is neither key text nor an
/// existing file, otherwise any `KeyError` from parsing.
pub fn read_public_key(text_or_path: &str) -> Result<PublicKey> {
    let value = text_or_path.trim();
    if looks_like_key_text(value) {
        return keys::parse_public_key(value);
    }

    let path = Path::new(value);
    if !path.is_file() {
        return Err(StoreError::FileNotFound(value.to_string()).into());
    }

    let contents = fs::read_to_string(path).map_err(|source| StoreError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), "read key file");

    let trimmed = contents.trim_start();
    if trimmed.starts_with("-----BEGIN") || trimmed.starts_with("AGE-SECRET-KEY-") {
        return keys::public_key_from_private(&contents);
    }

    let line = contents
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .unwrap_or_default();
    keys::parse_public_key(line)
}

fn looks_like_key_text(value: &str) -> bool {
    value.starts_with("age1")
        || value.starts_with("ssh-")
        || value.starts_with("ecdsa-")
        || value.starts_with("sk-")
}

/// Check that a file has no group or world permissions.
#[cfg(unix)]
pub fn validate_file_permissions(path: &Path, expected: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)
        .map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?
        .permissions()
        .mode()
        & 0o777;

    if mode & !expected != 0 {
        return Err(StoreError::ReadFailed {
            path: path.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("mode {:o} is more permissive than {:o}", mode, expected),
            ),
        }
        .into());
    }

    Ok(())
}
