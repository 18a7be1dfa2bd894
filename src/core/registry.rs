//! Recipient registry.
//!
//! An ordered list of the people who can decrypt a project's secrets.
//! Insertion order is preserved everywhere (on disk, in listings and in the
//! envelope's wrapped-key entries) so re-encrypting an unchanged team yields
//! a stable layout.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::keys::PublicKey;
use crate::core::types::{Handle, MemberName};
use crate::error::{RegistryError, Result};

/// A team member who can decrypt secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    name: MemberName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github: Option<Handle>,
    public_key: PublicKey,
    added_at: DateTime<Utc>,
}

impl Recipient {
    /// Create a recipient added now.
    pub fn new(name: impl Into<MemberName>, public_key: PublicKey) -> Self {
        Self {
            name: name.into(),
            github: None,
            public_key,
            added_at: Utc::now().trunc_subsecs(0),
        }
    }

    /// Attach an external identity handle. A leading `@` is dropped.
    pub fn with_github(mut self, handle: impl AsRef<str>) -> Self {
        let handle = normalize_handle(handle.as_ref());
        self.github = (!handle.is_empty()).then(|| handle.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn github(&self) -> Option<&str> {
        self.github.as_deref()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// Selects the recipient to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher<'a> {
    /// Exact display name.
    Name(&'a str),
    /// External handle, case-insensitive, with or without a leading `@`.
    Handle(&'a str),
    /// Display name or handle; the first recipient matching either is selected.
    NameOrHandle(&'a str),
}

impl Matcher<'_> {
    fn matches(&self, recipient: &Recipient) -> bool {
        match *self {
            Self::Name(name) => recipient.name == name,
            Self::Handle(handle) => recipient
                .github
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(normalize_handle(handle))),
            Self::NameOrHandle(query) => {
                Self::Name(query).matches(recipient) || Self::Handle(query).matches(recipient)
            }
        }
    }
}

impl fmt::Display for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Handle(handle) => write!(f, "@{}", normalize_handle(handle)),
            Self::NameOrHandle(query) => f.write_str(query),
        }
    }
}

fn normalize_handle(handle: &str) -> &str {
    handle.trim().trim_start_matches('@')
}

/// Ordered set of recipients, unique by public key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientRegistry {
    recipients: Vec<Recipient>,
}

impl RecipientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted recipients, re-checking uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateRecipient` if two entries share a key.
    pub fn from_recipients(recipients: impl IntoIterator<Item = Recipient>) -> Result<Self> {
        let mut registry = Self::new();
        for recipient in recipients {
            registry.add(recipient)?;
        }
        Ok(registry)
    }

    /// Append a recipient.
    ///
    /// Uniqueness is decided by byte equality of public keys, never by
    /// fingerprint. Names may repeat.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateRecipient` if the key is already present.
    pub fn add(&mut self, recipient: Recipient) -> Result<()> {
        if let Some(existing) = self
            .recipients
            .iter()
            .find(|r| r.public_key == recipient.public_key)
        {
            return Err(RegistryError::DuplicateRecipient(existing.name.clone()).into());
        }

        debug!(
            name = %recipient.name,
            key_type = %recipient.public_key.key_type(),
            "recipient added"
        );
        self.recipients.push(recipient);
        Ok(())
    }

    /// Remove the first recipient selected by `matcher`.
    ///
    /// When several recipients match, only the earliest added is removed.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RecipientNotFound` if nothing matches.
    pub fn remove(&mut self, matcher: Matcher<'_>) -> Result<Recipient> {
        let index = self
            .recipients
            .iter()
            .position(|r| matcher.matches(r))
            .ok_or_else(|| RegistryError::RecipientNotFound(matcher.to_string()))?;

        let removed = self.recipients.remove(index);
        debug!(name = %removed.name, remaining = self.recipients.len(), "recipient removed");
        Ok(removed)
    }

    /// First recipient selected by `matcher`.
    pub fn find(&self, matcher: Matcher<'_>) -> Option<&Recipient> {
        self.recipients.iter().find(|r| matcher.matches(r))
    }

    /// Recipients in insertion order.
    pub fn list(&self) -> &[Recipient] {
        &self.recipients
    }

    /// Public keys in insertion order, ready for encryption.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.recipients
            .iter()
            .map(|r| r.public_key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn into_vec(self) -> Vec<Recipient> {
        self.recipients
    }
}
