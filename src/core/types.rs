//! Core data types shared by the chat components and the output layer

use serde::{Deserialize, Serialize};

use crate::consts::{BOT_NAME, DEFAULT_USER_NAME};

/// Originator of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Sender {
    User,
    Bot,
}

/// One chat turn, stored and displayed in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Message {
    pub(crate) text: String,
    pub(crate) sender: Sender,
}

impl Message {
    pub(crate) fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub(crate) fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }

    /// `"{speaker}: {text}"`, as printed and shared
    pub(crate) fn labelled(&self, user_name: &str) -> String {
        let speaker = match self.sender {
            Sender::User => user_name,
            Sender::Bot => BOT_NAME,
        };
        format!("{speaker}: {}", self.text)
    }

    /// The bot's opening turn for a fresh conversation
    pub(crate) fn greeting(name: &str) -> Self {
        let name = if name.trim().is_empty() {
            DEFAULT_USER_NAME
        } else {
            name
        };
        Self::bot(format!("Hi {name}, I am {BOT_NAME} 😊"))
    }
}

/// History list entry, normalized from whatever shape the backend returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SessionSummary {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) date: String,
    pub(crate) preview: String,
}
