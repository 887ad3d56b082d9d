//! Session state tracker
//!
//! Owns the identity and title of the current conversation. Both are
//! persisted on every change so the same session resumes after a restart.

use uuid::Uuid;

use crate::consts::{DEFAULT_TITLE, TITLE_MAX_CHARS, keys};
use crate::error::StorageError;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionTracker {
    id: String,
    title: String,
}

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// First `TITLE_MAX_CHARS` characters of `text`, with an ellipsis when cut
pub(crate) fn derive_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

impl SessionTracker {
    pub(crate) fn init(storage: &mut dyn Storage) -> Result<Self, StorageError> {
        let id = match storage.get(keys::SESSION_ID) {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                let id = new_session_id();
                tracing::debug!(session_id = %id, "no stored session, starting a new one");
                storage.set(keys::SESSION_ID, &id)?;
                id
            }
        };
        let title = storage
            .get(keys::SESSION_TITLE)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        Ok(Self { id, title })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    pub(crate) fn refresh(&mut self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        let mut id = new_session_id();
        while id == self.id {
            id = new_session_id();
        }
        self.id = id;
        self.title = DEFAULT_TITLE.to_string();
        storage.set(keys::SESSION_ID, &self.id)?;
        storage.set(keys::SESSION_TITLE, &self.title)
    }

    /// Name the session after its first user message; later calls are no-ops
    pub(crate) fn derive_title_on_first_message(
        &mut self,
        storage: &mut dyn Storage,
        text: &str,
        is_first_user_message: bool,
    ) -> Result<(), StorageError> {
        if !self.has_default_title() || !is_first_user_message {
            return Ok(());
        }
        let title = derive_title(text);
        storage.set(keys::SESSION_TITLE, &title)?;
        self.title = title;
        Ok(())
    }

    /// Switch to an existing session without minting a new id
    pub(crate) fn adopt(
        &mut self,
        storage: &mut dyn Storage,
        session_id: &str,
        title: &str,
    ) -> Result<(), StorageError> {
        self.id = session_id.to_string();
        self.title = title.to_string();
        storage.set(keys::SESSION_ID, &self.id)?;
        storage.set(keys::SESSION_TITLE, &self.title)
    }
}
