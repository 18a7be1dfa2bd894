//! Locating the caller's wrapped key inside an envelope.

use tracing::{debug, warn};

use crate::core::envelope::{Envelope, WrappedKeyEntry};
use crate::core::keys::{Fingerprint, PrivateKey};
use crate::error::DecryptionError;

/// Find the single entry wrapped for `key`.
///
/// Every entry is examined. An envelope carrying the caller's fingerprint
/// more than once cannot have been produced by [`crate::core::cipher::encrypt`],
/// so it is treated as tampered rather than guessing which entry to trust.
///
/// # Errors
///
/// - `DecryptionError::RecipientNotFound` if no entry matches
/// - `DecryptionError::IntegrityCheckFailed` if several entries match
pub fn resolve<'a>(
    envelope: &'a Envelope,
    key: &PrivateKey,
) -> Result<&'a WrappedKeyEntry, DecryptionError> {
    resolve_fingerprint(envelope, &key.fingerprint())
}

/// Same as [`resolve`], keyed directly by fingerprint.
pub fn resolve_fingerprint<'a>(
    envelope: &'a Envelope,
    fingerprint: &Fingerprint,
) -> Result<&'a WrappedKeyEntry, DecryptionError> {
    let matches: Vec<&WrappedKeyEntry> = envelope
        .entries()
        .iter()
        .filter(|entry| entry.fingerprint() == fingerprint)
        .collect();

    match matches.as_slice() {
        [] => {
            debug!(fingerprint = %fingerprint.short(), "no matching entry");
            Err(DecryptionError::RecipientNotFound(fingerprint.clone()))
        }
        [entry] => Ok(entry),
        _ => {
            warn!(
                fingerprint = %fingerprint.short(),
                matches = matches.len(),
                "envelope lists the same recipient more than once"
            );
            Err(DecryptionError::IntegrityCheckFailed)
        }
    }
}
