//! Wire types for the chat backend
//!
//! The backend is not consistent about field names, so the raw types accept
//! every known variant and leave precedence to `normalize`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) message: &'a str,
    pub(crate) session_id: &'a str,
    pub(crate) title: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    pub(crate) response: String,
}

/// Session object from `/api/sessions`
///
/// Every field is kept untyped so that one oddly typed value only affects
/// its own entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSession {
    #[serde(default)]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) session_id: Option<Value>,
    #[serde(default)]
    pub(crate) title: Option<Value>,
    #[serde(default)]
    pub(crate) timestamp: Option<Value>,
    #[serde(default)]
    pub(crate) created_at: Option<Value>,
    #[serde(default)]
    pub(crate) preview: Option<Value>,
}

/// One stored turn: either `{role, content}` or `{sender, text}`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawMessage {
    #[serde(default)]
    pub(crate) role: Option<Value>,
    #[serde(default)]
    pub(crate) sender: Option<Value>,
    #[serde(default)]
    pub(crate) content: Option<Value>,
    #[serde(default)]
    pub(crate) text: Option<Value>,
}

/// Body of `/api/chat/{sessionId}`; records are decoded one by one in `normalize`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ChatPayload {
    Bare(Vec<Value>),
    Wrapped { messages: Vec<Value> },
}
