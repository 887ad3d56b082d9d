//! Backend API access
//!
//! `ChatApi` is the seam between the chat flow and the network. The
//! production implementation is `HttpChatApi`; tests substitute fakes.

mod http;
mod normalize;
mod types;

use crate::error::ChatError;

pub(crate) use http::HttpChatApi;
pub(crate) use normalize::{normalize_messages, normalize_sessions};
pub(crate) use types::{ChatPayload, ChatRequest, RawSession};

pub(crate) trait ChatApi {
    /// `GET /api/sessions?userId=`
    fn list_sessions(&self, user_id: &str) -> Result<Vec<RawSession>, ChatError>;

    /// `POST /api/chatbot`, returning the bot's reply text
    fn send_message(&self, request: &ChatRequest<'_>) -> Result<String, ChatError>;

    /// `GET /api/chat/{sessionId}?userId=`
    fn fetch_session(&self, session_id: &str, user_id: &str) -> Result<ChatPayload, ChatError>;
}
