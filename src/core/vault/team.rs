//! Team operations.
//!
//! Registry changes only touch `ghost.toml`. The envelope keeps its old
//! recipient set until the next push, which is what actually grants or
//! revokes access.

use super::Vault;
use crate::core::keys::PublicKey;
use crate::core::registry::{Matcher, Recipient};
use crate::error::Result;

impl Vault {
    /// Add a team member.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateRecipient` if the key is already registered.
    pub fn invite(
        &mut self,
        name: &str,
        public_key: PublicKey,
        github: Option<&str>,
    ) -> Result<&Recipient> {
        let mut recipient = Recipient::new(name, public_key);
        if let Some(handle) = github {
            recipient = recipient.with_github(handle);
        }

        self.registry.add(recipient)?;
        self.save()?;

        let index = self.registry.len() - 1;
        Ok(&self.registry.list()[index])
    }

    /// Remove the first team member whose name or handle matches `query`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RecipientNotFound` if nobody matches.
    pub fn remove(&mut self, query: &str) -> Result<Recipient> {
        let removed = self.registry.remove(Matcher::NameOrHandle(query))?;
        self.save()?;
        Ok(removed)
    }

    /// List team members in the order they were added.
    pub fn recipients(&self) -> &[Recipient] {
        self.registry.list()
    }
}
