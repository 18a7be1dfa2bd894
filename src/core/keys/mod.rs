//! Key parsing, validation and fingerprinting.
//!
//! Public keys arrive as a single line of text (the format found in
//! `authorized_keys` files, `.pub` files, or an age recipient string).
//! Private keys arrive as the contents of a key file.
//!
//! | Type          | Public form         | Private form                        |
//! |---------------|---------------------|-------------------------------------|
//! | `ssh-ed25519` | `ssh-ed25519 AAAA…` | OpenSSH container, optional passphrase |
//! | `ssh-rsa`     | `ssh-rsa AAAA…`     | OpenSSH container, optional passphrase |
//! | `x25519`      | `age1…`             | `AGE-SECRET-KEY-1…`                 |
//!
//! Key identity is byte equality of the canonical encoding. The
//! [`Fingerprint`] is derived from those same bytes and is only used for
//! display and for locating a wrapped key inside an envelope.

mod openssh;

use std::fmt;
use std::hash::{Hash, Hasher};

use age::secrecy::SecretString;
use age::{ssh, x25519};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::error::{KeyError, Result};

/// Number of digest bytes kept in a fingerprint.
const FINGERPRINT_BYTES: usize = 16;

/// Supported key algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Ed25519,
    Rsa,
    X25519,
}

impl KeyType {
    /// Display tag for this key type.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ssh-ed25519",
            Self::Rsa => "ssh-rsa",
            Self::X25519 => "x25519",
        }
    }

    fn from_ssh_name(name: &str) -> Result<Self> {
        match name {
            "ssh-ed25519" => Ok(Self::Ed25519),
            "ssh-rsa" => Ok(Self::Rsa),
            other => Err(KeyError::UnsupportedType(other.to_string()).into()),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Short digest of a public key's canonical bytes.
///
/// Rendered as 32 lowercase hex characters (128 bits of SHA-256).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(hex::encode(&digest[..FINGERPRINT_BYTES]))
    }

    /// Hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters, for compact listings.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let valid = value.len() == FINGERPRINT_BYTES * 2
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(value))
        } else {
            Err(format!("invalid fingerprint '{}'", value))
        }
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256:{}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.0)
    }
}

/// A validated public key.
///
/// Immutable once parsed. Equality and hashing use the canonical bytes only.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    key_type: KeyType,
    canonical: Vec<u8>,
    text: String,
}

impl PublicKey {
    /// Declared key type. Display only.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Canonical encoding used for equality and fingerprinting.
    pub fn as_bytes(&self) -> &[u8] {
        &self.canonical
    }

    /// Normalized one-line text form (no comment).
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(self)
    }

    /// Build the age recipient used to wrap a data key for this key.
    pub(crate) fn to_age_recipient(&self) -> Result<Box<dyn age::Recipient>> {
        match self.key_type {
            KeyType::X25519 => {
                let recipient: x25519::Recipient = self
                    .text
                    .parse()
                    .map_err(|e: &str| KeyError::Malformed(e.to_string()))?;
                Ok(Box::new(recipient))
            }
            KeyType::Ed25519 | KeyType::Rsa => {
                let recipient: ssh::Recipient = self.text.parse().map_err(|_| {
                    KeyError::Malformed(format!("{} key rejected by age", self.key_type))
                })?;
                Ok(Box::new(recipient))
            }
        }
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl TryFrom<String> for PublicKey {
    type Error = crate::error::Error;

    fn try_from(value: String) -> Result<Self> {
        parse_public_key(&value)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.text
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("type", &self.key_type)
            .field("fingerprint", &self.fingerprint().as_str())
            .finish()
    }
}

enum Secret {
    X25519(x25519::Identity),
    Ssh(ssh::Identity),
}

/// A parsed private key, ready to unwrap data keys.
pub struct PrivateKey {
    public: PublicKey,
    secret: Secret,
}

impl PrivateKey {
    /// Public half of this key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.public.fingerprint()
    }

    pub(crate) fn as_age(&self) -> &dyn age::Identity {
        match &self.secret {
            Secret::X25519(identity) => identity,
            Secret::Ssh(identity) => identity,
        }
    }
}

impl From<x25519::Identity> for PrivateKey {
    fn from(identity: x25519::Identity) -> Self {
        let text = identity.to_public().to_string();
        Self {
            public: PublicKey {
                key_type: KeyType::X25519,
                canonical: text.as_bytes().to_vec(),
                text,
            },
            secret: Secret::X25519(identity),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public)
            .finish_non_exhaustive()
    }
}

/// Parse and validate a public key.
///
/// Accepts `ssh-ed25519`, `ssh-rsa` (an optional trailing comment is
/// ignored) and `age1…` recipients.
///
/// # Errors
///
/// `KeyError::Malformed` if the text is not a recognized encoding,
/// `KeyError::UnsupportedType` for SSH key types other than ed25519 and RSA.
pub fn parse_public_key(raw: &str) -> Result<PublicKey> {
    let mut fields = raw.split_whitespace();
    let prefix = fields
        .next()
        .ok_or_else(|| KeyError::Malformed("empty key".to_string()))?;

    if prefix.starts_with("age1") {
        let recipient: x25519::Recipient = prefix
            .parse()
            .map_err(|e: &str| KeyError::Malformed(e.to_string()))?;
        let text = recipient.to_string();
        trace!(key_type = "x25519", "parsed public key");
        return Ok(PublicKey {
            key_type: KeyType::X25519,
            canonical: text.as_bytes().to_vec(),
            text,
        });
    }

    let looks_like_ssh =
        prefix.starts_with("ssh-") || prefix.starts_with("ecdsa-") || prefix.starts_with("sk-");
    if !looks_like_ssh {
        return Err(KeyError::Malformed(format!(
            "unrecognized key prefix '{}'",
            truncate(prefix, 16)
        ))
        .into());
    }

    let key_type = KeyType::from_ssh_name(prefix)?;
    let encoded = fields
        .next()
        .ok_or_else(|| KeyError::Malformed(format!("{} key is missing its data", prefix)))?;
    let blob = STANDARD
        .decode(encoded)
        .map_err(|e| KeyError::Malformed(format!("invalid base64 in public key: {}", e)))?;

    public_key_from_blob(key_type, blob)
}

fn public_key_from_blob(key_type: KeyType, blob: Vec<u8>) -> Result<PublicKey> {
    let embedded = openssh::blob_key_type(&blob)?;
    if embedded != key_type.tag() {
        return Err(KeyError::Malformed(format!(
            "key data is '{}' but labelled '{}'",
            embedded, key_type
        ))
        .into());
    }

    let key = PublicKey {
        key_type,
        text: format!("{} {}", key_type.tag(), STANDARD.encode(&blob)),
        canonical: blob,
    };

    // age must accept the key, otherwise encryption would fail later.
    key.to_age_recipient()?;

    trace!(key_type = %key_type, "parsed public key");
    Ok(key)
}

/// Parse a private key file's contents.
///
/// # Errors
///
/// - `KeyError::PassphraseRequired` if the key is encrypted and no passphrase was given
/// - `KeyError::WrongPassphrase` if the passphrase does not decrypt the key
/// - `KeyError::Malformed` / `KeyError::UnsupportedType` otherwise
pub fn parse_private_key(raw: &str, passphrase: Option<&str>) -> Result<PrivateKey> {
    let trimmed = raw.trim();

    if trimmed.starts_with("AGE-SECRET-KEY-") {
        let identity: x25519::Identity = trimmed
            .parse()
            .map_err(|e: &str| KeyError::Malformed(e.to_string()))?;
        debug!(key_type = "x25519", "parsed private key");
        return Ok(PrivateKey::from(identity));
    }

    if !trimmed.starts_with(openssh::PEM_BEGIN) {
        return Err(KeyError::Malformed(
            "expected an OpenSSH private key or an AGE-SECRET-KEY".to_string(),
        )
        .into());
    }

    let header = openssh::read_private_header(trimmed)?;
    let public = public_key_from_header(&header)?;
    let key_type = public.key_type;

    let identity = match ssh::Identity::from_buffer(raw.as_bytes(), None)
        .map_err(|e| KeyError::Malformed(e.to_string()))?
    {
        ssh::Identity::Encrypted(locked) => {
            let passphrase = passphrase.ok_or(KeyError::PassphraseRequired)?;
            let unlocked = locked
                .decrypt(SecretString::from(passphrase.to_owned()))
                .map_err(|_| KeyError::WrongPassphrase)?;
            ssh::Identity::Unencrypted(unlocked)
        }
        ssh::Identity::Unsupported(_) => {
            return Err(KeyError::UnsupportedType(format!(
                "{} private key (cipher '{}')",
                key_type, header.cipher
            ))
            .into());
        }
        unencrypted => unencrypted,
    };

    debug!(
        key_type = %key_type,
        encrypted = header.is_encrypted(),
        "parsed private key"
    );

    Ok(PrivateKey {
        public,
        secret: Secret::Ssh(identity),
    })
}

/// Public half of a private key file, read without any passphrase.
///
/// OpenSSH containers keep the public key in cleartext, so this works for
/// protected keys too.
pub fn public_key_from_private(raw: &str) -> Result<PublicKey> {
    let trimmed = raw.trim();

    if trimmed.starts_with("AGE-SECRET-KEY-") {
        return Ok(parse_private_key(trimmed, None)?.public);
    }

    if !trimmed.starts_with(openssh::PEM_BEGIN) {
        return Err(KeyError::Malformed(
            "expected an OpenSSH private key or an AGE-SECRET-KEY".to_string(),
        )
        .into());
    }

    public_key_from_header(&openssh::read_private_header(trimmed)?)
}

fn public_key_from_header(header: &openssh::PrivateKeyHeader) -> Result<PublicKey> {
    let key_type = KeyType::from_ssh_name(&openssh::blob_key_type(&header.public_blob)?)?;
    public_key_from_blob(key_type, header.public_blob.clone())
}

/// Fingerprint of a public key. Pure function of its canonical bytes.
pub fn fingerprint(key: &PublicKey) -> Fingerprint {
    Fingerprint::of_bytes(&key.canonical)
}

/// Key type tag, for display.
pub fn key_type(key: &PublicKey) -> &'static str {
    key.key_type.tag()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
