//! Encrypting the env file into the envelope and back.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::Vault;
use crate::core::cipher;
use crate::core::env;
use crate::core::envelope::Envelope;
use crate::core::git;
use crate::core::keys::{Fingerprint, PrivateKey};
use crate::error::{Result, StoreError};

/// Result of a push.
#[derive(Debug, Clone)]
pub struct PushReport {
    pub output: PathBuf,
    pub variables: usize,
    pub recipients: usize,
}

/// Result of a pull.
#[derive(Debug, Clone)]
pub struct PullReport {
    pub env_file: PathBuf,
    pub variables: usize,
    pub created_at: DateTime<Utc>,
}

/// One wrapped-key entry of an inspected envelope.
#[derive(Debug, Clone)]
pub struct InspectedRecipient {
    pub fingerprint: Fingerprint,
    /// Registry name for this fingerprint, if still registered.
    pub name: Option<String>,
}

/// Envelope metadata, read without decrypting anything.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub version: String,
    pub cipher: String,
    pub created_at: DateTime<Utc>,
    pub ciphertext_len: usize,
    pub recipients: Vec<InspectedRecipient>,
    /// Registered recipients the envelope was not encrypted for.
    pub pending: Vec<String>,
    /// Whether the given key can open the envelope, when one was supplied.
    pub is_recipient: Option<bool>,
}

impl Inspection {
    /// Entries whose fingerprint no longer belongs to a registered recipient.
    pub fn revoked(&self) -> usize {
        self.recipients.iter().filter(|r| r.name.is_none()).count()
    }

    /// Whether the envelope's recipients differ from the registry.
    pub fn is_stale(&self) -> bool {
        !self.pending.is_empty() || self.revoked() > 0
    }
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
///
/// Readers see either the old file or the complete new one.
fn write_replacing(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()));

    let written = std::fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    let result = written.and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

impl Vault {
    /// Encrypt the env file for every registered recipient and write the envelope.
    ///
    /// # Errors
    ///
    /// `StoreError::FileNotFound` if the env file is missing,
    /// `CipherError::NoRecipients` if nobody is registered.
    pub fn push(&self) -> Result<PushReport> {
        let env_path = self.env_path();
        let plaintext = env::read(&env_path)?;
        let variables = env::count_variables(&String::from_utf8_lossy(&plaintext));

        let recipients = self.registry.public_keys();
        let envelope = cipher::encrypt(&plaintext, &recipients)?;

        let output = self.output_path();
        let mut json = envelope.to_json()?;
        json.push('\n');
        write_replacing(&output, json.as_bytes()).map_err(|source| StoreError::WriteFailed {
            path: output.display().to_string(),
            source,
        })?;

        info!(
            recipients = recipients.len(),
            variables,
            "envelope written"
        );

        Ok(PushReport {
            output,
            variables,
            recipients: recipients.len(),
        })
    }

    /// Stage the envelope file with git.
    pub fn stage_output(&self) -> Result<()> {
        git::stage(&self.root, &self.output_path())
    }

    /// Read and parse the envelope file.
    ///
    /// # Errors
    ///
    /// `StoreError::FileNotFound` if it does not exist, otherwise any
    /// envelope parsing error.
    pub fn read_envelope(&self) -> Result<Envelope> {
        let path = self.output_path();
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.display().to_string()).into());
        }
        let json = std::fs::read_to_string(&path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Envelope::from_json(&json)
    }

    /// Decrypt the envelope with `key` and write the env file.
    ///
    /// Nothing is written unless decryption fully succeeds.
    pub fn pull(&self, key: &PrivateKey) -> Result<PullReport> {
        let envelope = self.read_envelope()?;
        let plaintext = cipher::decrypt(&envelope, key)?;

        let env_file = self.env_path();
        env::write(&env_file, &plaintext)?;

        let variables = env::count_variables(&String::from_utf8_lossy(&plaintext));
        debug!(variables, "env file restored");

        Ok(PullReport {
            env_file,
            variables,
            created_at: envelope.created_at(),
        })
    }

    /// Describe the envelope and compare its recipients with the registry.
    pub fn inspect(&self, fingerprint: Option<&Fingerprint>) -> Result<Inspection> {
        let envelope = self.read_envelope()?;

        let recipients = envelope
            .entries()
            .iter()
            .map(|entry| InspectedRecipient {
                fingerprint: entry.fingerprint().clone(),
                name: self
                    .registry
                    .list()
                    .iter()
                    .find(|r| &r.public_key().fingerprint() == entry.fingerprint())
                    .map(|r| r.name().to_string()),
            })
            .collect();

        let pending = self
            .registry
            .list()
            .iter()
            .filter(|r| !envelope.has_recipient(&r.public_key().fingerprint()))
            .map(|r| r.name().to_string())
            .collect();

        Ok(Inspection {
            version: envelope.version().to_string(),
            cipher: envelope.cipher_suite().to_string(),
            created_at: envelope.created_at(),
            ciphertext_len: envelope.ciphertext().len(),
            recipients,
            pending,
            is_recipient: fingerprint.map(|fp| envelope.has_recipient(fp)),
        })
    }
}
