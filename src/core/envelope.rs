//! Envelope data model and JSON serialization.
//!
//! An envelope is immutable once produced. Updating secrets means building a
//! new envelope with [`crate::core::cipher::encrypt`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::{CIPHER_SUITE, FORMAT_VERSION, NONCE_LEN};
use crate::core::keys::Fingerprint;
use crate::error::{CipherError, Result};

/// A data key wrapped for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedKeyEntry {
    pub(crate) fingerprint: Fingerprint,
    #[serde(with = "base64_bytes")]
    pub(crate) wrapped_key: Vec<u8>,
}

impl WrappedKeyEntry {
    /// Fingerprint of the recipient this entry was wrapped for.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Wrapped data key bytes.
    pub fn wrapped_key(&self) -> &[u8] {
        &self.wrapped_key
    }
}

/// Versioned, self-describing container for an encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub(crate) version: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) cipher: String,
    #[serde(with = "base64_bytes")]
    pub(crate) nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) recipients: Vec<WrappedKeyEntry>,
}

/// Just enough of an envelope to decide whether we understand it.
#[derive(Deserialize)]
struct Probe {
    #[serde(default)]
    version: String,
    #[serde(default)]
    cipher: String,
}

impl Envelope {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn cipher_suite(&self) -> &str {
        &self.cipher
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Wrapped-key entries, in the order recipients were given at encryption.
    pub fn entries(&self) -> &[WrappedKeyEntry] {
        &self.recipients
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Whether any entry was wrapped for the given fingerprint.
    pub fn has_recipient(&self, fingerprint: &Fingerprint) -> bool {
        self.recipients.iter().any(|e| &e.fingerprint == fingerprint)
    }

    /// Check the format version and cipher suite are ones this build understands.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::UnsupportedFormat` otherwise.
    pub fn ensure_supported(&self) -> Result<()> {
        check_supported(&self.version, &self.cipher)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CipherError::EncryptionFailed(format!("failed to serialize envelope: {}", e)).into()
        })
    }

    /// Parse an envelope from JSON.
    ///
    /// The version and cipher suite are checked before the rest of the
    /// document is interpreted.
    ///
    /// # Errors
    ///
    /// `CipherError::UnsupportedFormat` for an unknown version or suite,
    /// `CipherError::MalformedEnvelope` for invalid JSON, base64 or
    /// fingerprints.
    pub fn from_json(json: &str) -> Result<Self> {
        let probe: Probe = serde_json::from_str(json)
            .map_err(|e| CipherError::MalformedEnvelope(e.to_string()))?;
        check_supported(&probe.version, &probe.cipher)?;

        let envelope: Self = serde_json::from_str(json)
            .map_err(|e| CipherError::MalformedEnvelope(e.to_string()))?;

        debug!(
            recipients = envelope.recipients.len(),
            ciphertext_len = envelope.ciphertext.len(),
            "envelope parsed"
        );

        Ok(envelope)
    }

    /// Authenticated header bytes for this envelope.
    pub(crate) fn associated_data(&self) -> Vec<u8> {
        let fingerprints: Vec<&Fingerprint> =
            self.recipients.iter().map(|e| &e.fingerprint).collect();
        associated_data(&self.version, &self.cipher, self.created_at, &fingerprints)
    }

    /// Nonce as a fixed-size array.
    pub(crate) fn nonce_array(&self) -> Result<[u8; NONCE_LEN]> {
        self.nonce.as_slice().try_into().map_err(|_| {
            CipherError::MalformedEnvelope(format!(
                "nonce must be {} bytes, got {}",
                NONCE_LEN,
                self.nonce.len()
            ))
            .into()
        })
    }
}

fn check_supported(version: &str, cipher: &str) -> Result<()> {
    if version != FORMAT_VERSION || cipher != CIPHER_SUITE {
        return Err(CipherError::UnsupportedFormat {
            version: version.to_string(),
            cipher: cipher.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Header fields bound into the payload's authentication tag.
///
/// Each field is length-prefixed so no two headers encode the same bytes.
pub(crate) fn associated_data(
    version: &str,
    cipher: &str,
    created_at: DateTime<Utc>,
    fingerprints: &[&Fingerprint],
) -> Vec<u8> {
    fn field(out: &mut Vec<u8>, bytes: &[u8]) {
        out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        out.extend_from_slice(bytes);
    }

    let mut out = Vec::new();
    field(&mut out, version.as_bytes());
    field(&mut out, cipher.as_bytes());
    field(&mut out, &created_at.timestamp().to_be_bytes());
    out.extend_from_slice(&(fingerprints.len() as u32).to_be_bytes());
    for fp in fingerprints {
        field(&mut out, fp.as_str().as_bytes());
    }
    out
}

/// Serde adapter storing binary fields as standard base64.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
