//! Configuration file management.
//!
//! Handles reading, writing, and validating `ghost.toml`, which doubles as
//! the persisted recipient registry.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::registry::{Recipient, RecipientRegistry};
use crate::error::{ConfigError, Result};

/// Project configuration stored in `ghost.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Metadata about the configuration
    pub ghost: Meta,
    /// File locations
    #[serde(default)]
    pub settings: Settings,
    /// Recipients, in the order they were added
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

/// Metadata section of the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Version of ghost that wrote the file
    pub version: String,
}

/// Paths relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Plaintext dotenv file
    #[serde(default = "default_env_file")]
    pub env_file: String,
    /// Encrypted envelope committed to the repository
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

fn default_env_file() -> String {
    constants::ENV_FILE.to_string()
}

fn default_output_file() -> String {
    constants::OUTPUT_FILE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            output_file: default_output_file(),
        }
    }
}

impl Config {
    /// Create a new empty configuration with current version
    pub fn new() -> Self {
        Self {
            ghost: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            settings: Settings::default(),
            recipients: Vec::new(),
        }
    }

    /// Path to the configuration file under `root`
    pub fn path(root: &Path) -> PathBuf {
        root.join(constants::CONFIG_FILE)
    }

    /// Check if a configuration file exists under `root`
    pub fn exists(root: &Path) -> bool {
        Self::path(root).exists()
    }

    /// Write a fresh configuration under `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyInitialized` if `ghost.toml` exists.
    pub fn create(root: &Path) -> Result<Self> {
        if Self::exists(root) {
            return Err(ConfigError::AlreadyInitialized.into());
        }
        let config = Self::new();
        config.save(root)?;
        Ok(config)
    }

    /// Load configuration from `ghost.toml`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or a key/registry
    /// error if a recipient entry is invalid.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(recipients = config.recipients.len(), "config loaded");

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to `ghost.toml`
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, root: &Path) -> Result<()> {
        debug!(recipients = self.recipients.len(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(Self::path(root), contents)?;

        Ok(())
    }

    /// Validate the configuration structure and contents
    ///
    /// Public keys are already checked while deserializing; this checks the
    /// required fields, that both file settings stay inside the project, and
    /// that no key is registered twice.
    pub fn validate(&self) -> Result<()> {
        if self.ghost.version.is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }
        validate_project_file("env_file", &self.settings.env_file)?;
        validate_project_file("output_file", &self.settings.output_file)?;

        self.registry()?;
        Ok(())
    }

    /// Recipients as a registry.
    pub fn registry(&self) -> Result<RecipientRegistry> {
        RecipientRegistry::from_recipients(self.recipients.iter().cloned())
    }

    /// Replace the stored recipients with the registry's contents.
    pub fn set_registry(&mut self, registry: RecipientRegistry) {
        self.recipients = registry.into_vec();
    }

    /// Absolute path of the plaintext env file
    pub fn env_path(&self, root: &Path) -> PathBuf {
        root.join(&self.settings.env_file)
    }

    /// Absolute path of the envelope file
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.settings.output_file)
    }
}

/// A file setting must be a plain relative path below the project root.
///
/// Only ASCII letters, digits, `.`, `_`, `-` and `/` are allowed, since the
/// names are also embedded in the pre-commit hook script.
fn validate_project_file(field: &'static str, value: &str) -> Result<()> {
    let invalid = |reason| ConfigError::InvalidPath {
        field,
        value: value.to_string(),
        reason,
    };

    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-' | b'/'))
    {
        return Err(invalid("only letters, digits, '.', '_', '-' and '/' are allowed").into());
    }

    let path = Path::new(value);
    if path.is_absolute() {
        return Err(invalid("must be relative to the project root").into());
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(invalid("must not leave the project directory").into()),
        }
    }
    if !path.components().any(|c| matches!(c, Component::Normal(_))) {
        return Err(invalid("must name a file").into());
    }

    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Ensure `.gitignore` under `root` ignores plaintext env files
///
/// Appends each of `.env`, `.env.local` and `.env.*.local` that is not
/// already present. Returns whether the file changed.
///
/// # Errors
///
/// Returns error if file operations fail.
pub fn ensure_gitignore(root: &Path) -> Result<bool> {
    let gitignore = root.join(".gitignore");

    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    for entry in constants::GITIGNORE_ENTRIES {
        if !existing.lines().any(|l| l.trim() == *entry) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(entry);
            updated.push('\n');
        }
    }

    if updated == existing {
        return Ok(false);
    }

    std::fs::write(&gitignore, updated)?;
    debug!("updated .gitignore");
    Ok(true)
}
