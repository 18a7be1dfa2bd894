//! Ghost - share `.env` secrets through git, encrypted for every teammate.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create ghost.toml
//! │   ├── invite        # Add a recipient
//! │   ├── remove        # Remove a recipient
//! │   ├── list          # List recipients
//! │   ├── push          # Encrypt .env into .env.ghost
//! │   ├── pull          # Decrypt .env.ghost into .env
//! │   ├── inspect       # Envelope metadata
//! │   ├── hook          # Pre-commit hook
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── keys/         # Public/private key parsing and fingerprints
//!     ├── cipher/       # Hybrid envelope encryption
//!     │   ├── mod       # encrypt / decrypt
//!     │   └── wrap      # Per-recipient data key wrapping (age)
//!     ├── envelope      # Envelope model and JSON format
//!     ├── resolver      # Finds the caller's wrapped key
//!     ├── registry      # Ordered recipient registry
//!     ├── config        # ghost.toml management
//!     ├── identity      # Local key files
//!     ├── git           # Git integration and hooks
//!     ├── env           # .env helpers
//!     └── vault/        # Project-level operations
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ghost::core::{cipher, keys};
//!
//! # fn main() -> ghost::error::Result<()> {
//! let alice = keys::parse_public_key("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAA...")?;
//! let envelope = cipher::encrypt(b"API_KEY=abc123\n", &[alice])?;
//! let json = envelope.to_json()?;
//!
//! let key = keys::parse_private_key(&std::fs::read_to_string("id_ed25519")?, None)?;
//! let envelope = ghost::core::envelope::Envelope::from_json(&json)?;
//! let plaintext = cipher::decrypt(&envelope, &key)?;
//! # let _ = plaintext;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
