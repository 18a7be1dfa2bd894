//! The primary interface for ghost operations.
//!
//! Vault ties the pure envelope core to the project on disk: it owns the
//! loaded `ghost.toml`, the recipient registry built from it, and the
//! project root that every relative path is resolved against.

mod sync;
mod team;

use std::path::{Path, PathBuf};

use tracing::debug;

pub use sync::{Inspection, InspectedRecipient, PullReport, PushReport};

use crate::core::config::{self, Config};
use crate::core::git;
use crate::core::registry::RecipientRegistry;
use crate::error::Result;

/// A ghost project rooted at a directory containing `ghost.toml`.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    config: Config,
    registry: RecipientRegistry,
}

impl Vault {
    /// Open an existing project.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if no `ghost.toml` exists.
    /// Returns error if the configuration is invalid or cannot be read.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let config = Config::load(&root)?;
        let registry = config.registry()?;

        debug!(root = %root.display(), recipients = registry.len(), "vault opened");

        Ok(Self {
            root,
            config,
            registry,
        })
    }

    /// Initialize a new project in a git repository.
    ///
    /// Creates `ghost.toml` with an empty registry and makes sure plaintext
    /// env files are git-ignored.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NotARepository` outside a repository and
    /// `ConfigError::AlreadyInitialized` if `ghost.toml` exists.
    pub fn init(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        git::ensure_repo(&root)?;

        let config = Config::create(&root)?;
        config::ensure_gitignore(&root)?;

        debug!(root = %root.display(), "vault initialized");

        Ok(Self {
            root,
            config,
            registry: RecipientRegistry::new(),
        })
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get config reference.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current recipients.
    pub fn registry(&self) -> &RecipientRegistry {
        &self.registry
    }

    /// Plaintext env file path.
    pub fn env_path(&self) -> PathBuf {
        self.config.env_path(&self.root)
    }

    /// Envelope file path.
    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }

    /// Persist the registry back to `ghost.toml`.
    fn save(&mut self) -> Result<()> {
        self.config.set_registry(self.registry.clone());
        self.config.save(&self.root)
    }
}
