//! Error types.
//!
//! Each concern has its own error enum; [`Error`] aggregates them so callers
//! can match on the precise failure while propagating with `?`.

use thiserror::Error;

use crate::core::keys::Fingerprint;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DecryptionError> for Error {
    fn from(e: DecryptionError) -> Self {
        Error::Cipher(CipherError::Decryption(e))
    }
}

/// Key parsing failures.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("malformed key: {0}")]
    Malformed(String),

    #[error("unsupported key type: {0}")]
    UnsupportedType(String),

    #[error("private key is protected by a passphrase")]
    PassphraseRequired,

    #[error("wrong passphrase for private key")]
    WrongPassphrase,
}

/// Envelope encryption and decryption failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("no recipients: add at least one recipient before encrypting")]
    NoRecipients,

    #[error("recipient key listed twice (fingerprint {0})")]
    DuplicateRecipient(Fingerprint),

    #[error("two different recipient keys share fingerprint {0}")]
    FingerprintCollision(Fingerprint),

    #[error("unsupported envelope format: version '{version}', cipher '{cipher}'")]
    UnsupportedFormat { version: String, cipher: String },

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptionError),
}

/// Why a decryption attempt failed.
///
/// The two cases need different advice: a missing recipient entry means the
/// caller was never granted access, a failed integrity check means the
/// artifact (or the key material) is damaged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("key {0} is not a recipient of this envelope")]
    RecipientNotFound(Fingerprint),

    #[error("integrity check failed")]
    IntegrityCheckFailed,
}

/// Recipient registry mutation failures.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("recipient already registered with this key: {0}")]
    DuplicateRecipient(String),

    #[error("recipient not found: {0}")]
    RecipientNotFound(String),
}

/// Configuration file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: run `ghost init` first")]
    NotInitialized,

    #[error("already initialized: ghost.toml exists")]
    AlreadyInitialized,

    #[error("failed to read config: {0}")]
    ReadFile(std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidPath {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Local key and file storage failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no private key found (looked in {0})")]
    NoPrivateKey(String),

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("file not found: {0}")]
    FileNotFound(String),
}

/// Version-control failures.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git is not installed or not on PATH")]
    NotInstalled,

    #[error("not a git repository")]
    NotARepository,

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("a pre-commit hook not installed by ghost already exists at {0}")]
    ForeignHook(String),
}

pub type Result<T> = std::result::Result<T, Error>;
