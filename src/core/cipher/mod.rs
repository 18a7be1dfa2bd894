//! Hybrid envelope encryption.
//!
//! A fresh 32-byte data key encrypts the payload with ChaCha20-Poly1305.
//! The data key is then wrapped once per recipient (see [`wrap`]) and each
//! wrapped copy is tagged with the recipient's fingerprint.
//!
//! ```text
//! plaintext ──ChaCha20-Poly1305(data key, nonce, header)──▶ ciphertext
//! data key  ──age(recipient 1)──▶ wrapped key 1
//!           ──age(recipient 2)──▶ wrapped key 2
//!           ...
//! ```
//!
//! The header (format version, cipher suite, creation time and the ordered
//! recipient fingerprints) is authenticated as associated data, so none of
//! it can be edited without failing decryption.
//!
//! Both operations are pure: inputs are in-memory values and the result is
//! a new value. Callers own all I/O.

mod wrap;

use std::collections::HashMap;

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use chrono::{SubsecRound, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::constants::{CIPHER_SUITE, DATA_KEY_LEN, FORMAT_VERSION, NONCE_LEN};
use crate::core::envelope::{self, Envelope, WrappedKeyEntry};
use crate::core::keys::{self, Fingerprint, PrivateKey, PublicKey};
use crate::core::resolver;
use crate::error::{CipherError, DecryptionError, Result};

/// Single-use symmetric key. Zeroized on drop.
pub(crate) struct DataKey(Zeroizing<[u8; DATA_KEY_LEN]>);

impl DataKey {
    pub(crate) fn generate() -> Self {
        let mut key = Zeroizing::new([0u8; DATA_KEY_LEN]);
        OsRng.fill_bytes(&mut *key);
        Self(key)
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != DATA_KEY_LEN {
            return None;
        }
        let mut key = Zeroizing::new([0u8; DATA_KEY_LEN]);
        key.copy_from_slice(bytes);
        Some(Self(key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; DATA_KEY_LEN] {
        &self.0
    }

    fn aead(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(self.as_bytes()))
    }
}

/// Encrypt `plaintext` so that every key in `recipients` can decrypt it.
///
/// Entries in the resulting envelope follow the order of `recipients`.
/// The data key and nonce are drawn fresh on every call, so encrypting the
/// same input twice never yields the same envelope.
///
/// # Errors
///
/// - `CipherError::NoRecipients` if `recipients` is empty
/// - `CipherError::DuplicateRecipient` if the same key appears twice
/// - `CipherError::FingerprintCollision` if two different keys share a fingerprint
/// - `CipherError::EncryptionFailed` if wrapping fails
pub fn encrypt(plaintext: &[u8], recipients: &[PublicKey]) -> Result<Envelope> {
    if recipients.is_empty() {
        return Err(CipherError::NoRecipients.into());
    }

    trace!(
        recipients = recipients.len(),
        plaintext_len = plaintext.len(),
        "encrypting"
    );

    let fingerprints = index_recipients(recipients, keys::fingerprint)?;

    let data_key = DataKey::generate();
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    let created_at = Utc::now().trunc_subsecs(0);

    let header: Vec<&Fingerprint> = fingerprints.iter().collect();
    let aad = envelope::associated_data(FORMAT_VERSION, CIPHER_SUITE, created_at, &header);

    let ciphertext = data_key
        .aead()
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|_| CipherError::EncryptionFailed("payload encryption failed".to_string()))?;

    let mut entries = Vec::with_capacity(recipients.len());
    for (key, fingerprint) in recipients.iter().zip(fingerprints) {
        entries.push(WrappedKeyEntry {
            wrapped_key: wrap::wrap(&data_key, key)?,
            fingerprint,
        });
    }

    debug!(
        recipients = entries.len(),
        ciphertext_len = ciphertext.len(),
        "encrypted"
    );

    Ok(Envelope {
        version: FORMAT_VERSION.to_string(),
        created_at,
        cipher: CIPHER_SUITE.to_string(),
        nonce: nonce.to_vec(),
        ciphertext,
        recipients: entries,
    })
}

/// Decrypt an envelope with a local private key.
///
/// The format version and cipher suite are checked before any
/// cryptographic work. No partial plaintext is ever returned.
///
/// # Errors
///
/// - `CipherError::UnsupportedFormat` for an unknown version or suite
/// - `CipherError::MalformedEnvelope` for a malformed nonce
/// - `DecryptionError::RecipientNotFound` if no entry matches the key
/// - `DecryptionError::IntegrityCheckFailed` if unwrapping or authentication fails
pub fn decrypt(envelope: &Envelope, key: &PrivateKey) -> Result<Zeroizing<Vec<u8>>> {
    envelope.ensure_supported()?;
    let nonce = envelope.nonce_array()?;

    trace!(
        entries = envelope.recipient_count(),
        ciphertext_len = envelope.ciphertext().len(),
        "decrypting"
    );

    let entry = resolver::resolve(envelope, key)?;
    let data_key = wrap::unwrap(entry.wrapped_key(), key)?;

    let aad = envelope.associated_data();
    let plaintext = data_key
        .aead()
        .decrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: envelope.ciphertext(),
                aad: &aad,
            },
        )
        .map_err(|_| DecryptionError::IntegrityCheckFailed)?;

    trace!(plaintext_len = plaintext.len(), "decrypted");

    Ok(Zeroizing::new(plaintext))
}

/// Fingerprint every recipient, refusing inputs where two share a fingerprint.
fn index_recipients<F>(recipients: &[PublicKey], fingerprint: F) -> Result<Vec<Fingerprint>>
where
    F: Fn(&PublicKey) -> Fingerprint,
{
    let mut seen: HashMap<Fingerprint, &PublicKey> = HashMap::with_capacity(recipients.len());
    let mut fingerprints = Vec::with_capacity(recipients.len());

    for key in recipients {
        let fp = fingerprint(key);
        if let Some(existing) = seen.get(&fp) {
            if *existing == key {
                return Err(CipherError::DuplicateRecipient(fp).into());
            }
            return Err(CipherError::FingerprintCollision(fp).into());
        }
        seen.insert(fp.clone(), key);
        fingerprints.push(fp);
    }

    Ok(fingerprints)
}
