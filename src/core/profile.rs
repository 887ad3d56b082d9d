//! Read-only view of the signed-in user
//!
//! `Name` and `Email` belong to the login collaborator; the chat core only
//! reads them. `save`/`clear` exist for the `login`/`logout` commands.

use crate::consts::{DEFAULT_USER_NAME, keys};
use crate::error::StorageError;
use crate::storage::Storage;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Profile {
    name: Option<String>,
    email: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Profile {
    pub(crate) fn load(storage: &dyn Storage) -> Self {
        Self {
            name: non_blank(storage.get(keys::NAME)),
            email: non_blank(storage.get(keys::EMAIL)),
        }
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_USER_NAME)
    }

    /// The backend identifies users by email
    pub(crate) fn user_id(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub(crate) fn save(
        storage: &mut dyn Storage,
        email: &str,
        name: Option<&str>,
    ) -> Result<Self, StorageError> {
        storage.set(keys::EMAIL, email.trim())?;
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => storage.set(keys::NAME, name)?,
            None => storage.remove(keys::NAME)?,
        }
        Ok(Self::load(storage))
    }

    pub(crate) fn clear(storage: &mut dyn Storage) -> Result<(), StorageError> {
        storage.remove(keys::EMAIL)?;
        storage.remove(keys::NAME)
    }
}
