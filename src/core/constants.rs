//! Constants used throughout ghost.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (ghost.toml).
pub const CONFIG_FILE: &str = "ghost.toml";

/// Default plaintext environment file.
pub const ENV_FILE: &str = ".env";

/// Default encrypted envelope file.
pub const OUTPUT_FILE: &str = ".env.ghost";

/// Envelope format version written by this build.
pub const FORMAT_VERSION: &str = "ghost-v1";

/// Payload cipher and key-wrapping scheme identifier.
pub const CIPHER_SUITE: &str = "chacha20poly1305+age";

/// Data key length in bytes.
pub const DATA_KEY_LEN: usize = 32;

/// ChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Private keys tried, in order, when no key path is given (relative to HOME).
pub const DEFAULT_KEY_PATHS: &[&str] = &[".ssh/id_ed25519", ".ssh/id_rsa"];

/// Environment variable holding a private key passphrase.
pub const PASSPHRASE_ENV: &str = "GHOST_PASSPHRASE";

/// Gitignore entries to protect plaintext secrets.
pub const GITIGNORE_ENTRIES: &[&str] = &[".env", ".env.local", ".env.*.local"];

/// Marker line identifying hooks installed by ghost.
pub const HOOK_MARKER: &str = "# ghost pre-commit hook";
