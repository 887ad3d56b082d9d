//! Message store
//!
//! Ordered transcript of the current session. The full list is re-encoded and
//! written to storage after every mutation.

use crate::consts::keys;
use crate::error::StorageError;
use crate::storage::Storage;

use super::types::{Message, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MessageStore {
    messages: Vec<Message>,
}

fn decode_stored(raw: &str) -> Option<Vec<Message>> {
    match serde_json::from_str::<Vec<Message>>(raw) {
        Ok(messages) if !messages.is_empty() => Some(messages),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "stored chat messages are unreadable, resetting");
            None
        }
    }
}

impl MessageStore {
    /// Restore the stored transcript, or start one with the greeting
    pub(crate) fn init(storage: &mut dyn Storage, name: &str) -> Result<Self, StorageError> {
        if let Some(messages) = storage.get(keys::MESSAGES).as_deref().and_then(decode_stored) {
            return Ok(Self { messages });
        }
        let mut store = Self {
            messages: Vec::new(),
        };
        store.reset(storage, name)?;
        Ok(store)
    }

    pub(crate) fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn has_user_messages(&self) -> bool {
        self.messages.iter().any(|m| m.sender == Sender::User)
    }

    pub(crate) fn append(
        &mut self,
        storage: &mut dyn Storage,
        message: Message,
    ) -> Result<(), StorageError> {
        self.messages.push(message);
        if let Err(e) = self.persist(storage) {
            self.messages.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Swap in a loaded transcript; an empty one becomes the greeting
    pub(crate) fn replace_all(
        &mut self,
        storage: &mut dyn Storage,
        messages: Vec<Message>,
        name: &str,
    ) -> Result<(), StorageError> {
        if messages.is_empty() {
            return self.reset(storage, name);
        }
        self.messages = messages;
        self.persist(storage)
    }

    pub(crate) fn reset(&mut self, storage: &mut dyn Storage, name: &str) -> Result<(), StorageError> {
        self.messages = vec![Message::greeting(name)];
        self.persist(storage)
    }

    fn persist(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.messages)?;
        storage.set(keys::MESSAGES, &encoded)
    }
}
