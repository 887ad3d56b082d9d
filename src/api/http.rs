use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::ChatError;

use super::ChatApi;
use super::normalize::raw_sessions;
use super::types::{ChatPayload, ChatReply, ChatRequest, RawSession};

/// Blocking client for the chat backend
pub(crate) struct HttpChatApi {
    agent: ureq::Agent,
    base_url: String,
}

fn decode<T: DeserializeOwned>(mut body: ureq::Body) -> Result<T, ChatError> {
    serde_json::from_reader(body.as_reader()).map_err(|e| ChatError::Decode(e.to_string()))
}

impl HttpChatApi {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ChatApi for HttpChatApi {
    fn list_sessions(&self, user_id: &str) -> Result<Vec<RawSession>, ChatError> {
        let url = self.url("/api/sessions");
        tracing::debug!(%url, "fetching chat sessions");
        let response = self.agent.get(&url).query("userId", user_id).call()?;
        let records: Vec<serde_json::Value> = decode(response.into_body())?;
        Ok(raw_sessions(records))
    }

    fn send_message(&self, request: &ChatRequest<'_>) -> Result<String, ChatError> {
        let url = self.url("/api/chatbot");
        tracing::debug!(%url, session_id = request.session_id, "sending chat message");
        let response = self.agent.post(&url).send_json(request)?;
        let reply: ChatReply = decode(response.into_body())?;
        Ok(reply.response)
    }

    fn fetch_session(&self, session_id: &str, user_id: &str) -> Result<ChatPayload, ChatError> {
        let url = self.url(&format!("/api/chat/{session_id}"));
        tracing::debug!(%url, "fetching chat transcript");
        let response = self.agent.get(&url).query("userId", user_id).call()?;
        let value: serde_json::Value = decode(response.into_body())?;
        serde_json::from_value(value).map_err(|_| ChatError::UnexpectedPayload)
    }
}
