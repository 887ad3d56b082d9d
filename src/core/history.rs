//! History fetcher
//!
//! Holds the last successfully fetched session list. A failed fetch leaves
//! the previous list in place.

use crate::api::{ChatApi, normalize_messages, normalize_sessions};
use crate::error::ChatError;
use crate::utils::Timezone;

use super::types::{Message, SessionSummary};

#[derive(Debug, Clone)]
pub(crate) struct HistoryFetcher {
    sessions: Vec<SessionSummary>,
    timezone: Timezone,
}

impl HistoryFetcher {
    pub(crate) fn new(timezone: Timezone) -> Self {
        Self {
            sessions: Vec::new(),
            timezone,
        }
    }

    pub(crate) fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub(crate) fn fetch_sessions(
        &mut self,
        api: &dyn ChatApi,
        user_id: &str,
    ) -> Result<&[SessionSummary], ChatError> {
        let raw = api.list_sessions(user_id)?;
        self.sessions = normalize_sessions(&raw, self.timezone);
        tracing::debug!(count = self.sessions.len(), "chat history refreshed");
        Ok(&self.sessions)
    }

    pub(crate) fn load_session(
        &self,
        api: &dyn ChatApi,
        session_id: &str,
        user_id: &str,
    ) -> Result<Vec<Message>, ChatError> {
        let payload = api.fetch_session(session_id, user_id)?;
        Ok(normalize_messages(payload))
    }

    pub(crate) fn find(&self, session_id: &str) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Look up a session by 1-based list position or by id
    pub(crate) fn resolve(&self, reference: &str) -> Option<&SessionSummary> {
        let reference = reference.trim();
        if let Ok(index) = reference.parse::<usize>()
            && index >= 1
            && let Some(summary) = self.sessions.get(index - 1)
        {
            return Some(summary);
        }
        self.find(reference)
    }
}
