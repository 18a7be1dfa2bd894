//! Per-recipient data key wrapping.
//!
//! Each data key is encrypted to a single recipient as a binary age file,
//! so the asymmetric part (X25519 agreement for `x25519` and `ssh-ed25519`
//! keys, RSA-OAEP for `ssh-rsa`) is handled by age's recipient stanzas.

use std::io::{Read, Write};

use tracing::trace;
use zeroize::Zeroizing;

use super::DataKey;
use crate::core::keys::{PrivateKey, PublicKey};
use crate::error::{CipherError, DecryptionError, Result};

/// Wrap `data_key` so only the holder of `recipient`'s private key can read it.
pub(crate) fn wrap(data_key: &DataKey, recipient: &PublicKey) -> Result<Vec<u8>> {
    let age_recipient = recipient.to_age_recipient()?;

    let encryptor = age::Encryptor::with_recipients(std::iter::once(age_recipient.as_ref()))
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    let mut wrapped = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut wrapped)
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
    writer.write_all(data_key.as_bytes())?;
    writer
        .finish()
        .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

    trace!(
        key_type = %recipient.key_type(),
        wrapped_len = wrapped.len(),
        "wrapped data key"
    );

    Ok(wrapped)
}

/// Recover a data key from an entry already matched to `key` by fingerprint.
///
/// Every failure here means the entry or the key material is damaged, so
/// all of them collapse into `IntegrityCheckFailed`.
pub(crate) fn unwrap(
    wrapped: &[u8],
    key: &PrivateKey,
) -> std::result::Result<DataKey, DecryptionError> {
    let decryptor = age::Decryptor::new(wrapped).map_err(|e| {
        trace!(error = %e, "wrapped key header rejected");
        DecryptionError::IntegrityCheckFailed
    })?;

    let mut reader = decryptor
        .decrypt(std::iter::once(key.as_age()))
        .map_err(|e| {
            trace!(error = %e, "wrapped key did not open");
            DecryptionError::IntegrityCheckFailed
        })?;

    let mut bytes = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut bytes)
        .map_err(|_| DecryptionError::IntegrityCheckFailed)?;

    DataKey::from_slice(&bytes).ok_or(DecryptionError::IntegrityCheckFailed)
}
