//! Send/load flow
//!
//! `ChatController` ties the session tracker, message store and history
//! fetcher to the backend. At most one request (a send or a history load) is
//! in flight; requests made while busy are skipped. Every operation gets a
//! fresh token, and a completion whose token is no longer current is dropped,
//! so a late reply can never write into a session the user has since left.
//!
//! A sent user message is stored before the backend answers and stays in the
//! transcript when the request fails.

use crate::api::{ChatApi, ChatRequest};
use crate::consts::DEFAULT_TITLE;
use crate::error::ChatError;
use crate::storage::Storage;
use crate::utils::Timezone;

use super::history::HistoryFetcher;
use super::messages::MessageStore;
use super::profile::Profile;
use super::session::SessionTracker;
use super::types::{Message, SessionSummary};

const SEND_FAILED: &str = "Failed to get response. Please try again.";
const HISTORY_FAILED: &str = "Failed to load chat history. Please try again.";
const LOAD_FAILED: &str = "Failed to load chat. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Idle,
    Sending(OpToken),
    LoadingHistory(OpToken),
}

impl Operation {
    fn token(self) -> Option<OpToken> {
        match self {
            Operation::Idle => None,
            Operation::Sending(token) | Operation::LoadingHistory(token) => Some(token),
        }
    }
}

/// Result of a send or load request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Nothing to do: blank input, or another request is in flight
    Skipped,
    Completed,
    /// The completion arrived after its operation was superseded
    Discarded,
}

/// A send that has been recorded locally and awaits the backend reply
#[derive(Debug)]
pub(crate) struct PendingSend {
    token: OpToken,
    user_id: String,
    message: String,
    session_id: String,
    title: String,
}

impl PendingSend {
    pub(crate) fn request(&self) -> ChatRequest<'_> {
        ChatRequest {
            user_id: &self.user_id,
            message: &self.message,
            session_id: &self.session_id,
            title: &self.title,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PendingLoad {
    token: OpToken,
    session_id: String,
    user_id: String,
}

impl PendingLoad {
    pub(crate) fn session_id(&self) -> &str {
        &self.session_id
    }

    pub(crate) fn user_id(&self) -> &str {
        &self.user_id
    }
}

pub(crate) struct ChatController<S: Storage, A: ChatApi> {
    storage: S,
    api: A,
    profile: Profile,
    session: SessionTracker,
    messages: MessageStore,
    history: HistoryFetcher,
    history_open: bool,
    input: String,
    error: Option<String>,
    operation: Operation,
    next_token: u64,
}

impl<S: Storage, A: ChatApi> ChatController<S, A> {
    /// Restore session and transcript from storage, creating them if absent
    pub(crate) fn new(mut storage: S, api: A, timezone: Timezone) -> Result<Self, ChatError> {
        let profile = Profile::load(&storage);
        let session = SessionTracker::init(&mut storage)?;
        let messages = MessageStore::init(&mut storage, profile.display_name())?;
        Ok(Self {
            storage,
            api,
            profile,
            session,
            messages,
            history: HistoryFetcher::new(timezone),
            history_open: false,
            input: String::new(),
            error: None,
            operation: Operation::Idle,
            next_token: 0,
        })
    }

    pub(crate) fn messages(&self) -> &[Message] {
        self.messages.messages()
    }

    pub(crate) fn session_id(&self) -> &str {
        self.session.id()
    }

    pub(crate) fn title(&self) -> &str {
        self.session.title()
    }

    pub(crate) fn profile(&self) -> &Profile {
        &self.profile
    }

    pub(crate) fn sessions(&self) -> &[SessionSummary] {
        self.history.sessions()
    }

    pub(crate) fn resolve_session(&self, reference: &str) -> Option<&SessionSummary> {
        self.history.resolve(reference)
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn operation(&self) -> Operation {
        self.operation
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.operation != Operation::Idle
    }

    pub(crate) fn history_open(&self) -> bool {
        self.history_open
    }

    #[cfg(test)]
    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send whatever is in the input buffer
    pub(crate) fn submit(&mut self) -> Result<Outcome, ChatError> {
        let text = self.input.clone();
        self.send(&text)
    }

    fn start(&mut self, make: fn(OpToken) -> Operation) -> OpToken {
        self.next_token += 1;
        let token = OpToken(self.next_token);
        self.operation = make(token);
        token
    }

    /// True when `token` still names the in-flight operation; resets to idle if so
    fn settle(&mut self, token: OpToken) -> bool {
        if self.operation.token() != Some(token) {
            tracing::debug!(?token, current = ?self.operation, "dropping stale completion");
            return false;
        }
        self.operation = Operation::Idle;
        true
    }

    fn require_user(&mut self) -> Result<String, ChatError> {
        match self.profile.user_id() {
            Some(user_id) => Ok(user_id.to_string()),
            None => {
                tracing::warn!("no authenticated user in profile");
                self.error = Some(ChatError::AuthRequired.to_string());
                Err(ChatError::AuthRequired)
            }
        }
    }

    /// Record the user's message and enter `Sending`; `None` when nothing should be sent
    pub(crate) fn begin_send(&mut self, text: &str) -> Result<Option<PendingSend>, ChatError> {
        if text.trim().is_empty() || self.is_busy() {
            return Ok(None);
        }
        let user_id = self.require_user()?;

        self.error = None;
        // Title is written before the turn so a failed write leaves no unsent message
        let is_first = !self.messages.has_user_messages();
        self.session
            .derive_title_on_first_message(&mut self.storage, text, is_first)?;
        self.messages.append(&mut self.storage, Message::user(text))?;
        self.input.clear();

        let token = self.start(Operation::Sending);
        Ok(Some(PendingSend {
            token,
            user_id,
            message: text.to_string(),
            session_id: self.session.id().to_string(),
            title: self.session.title().to_string(),
        }))
    }

    pub(crate) fn finish_send(
        &mut self,
        pending: PendingSend,
        result: Result<String, ChatError>,
    ) -> Result<Outcome, ChatError> {
        if !self.settle(pending.token) {
            return Ok(Outcome::Discarded);
        }
        match result {
            Ok(reply) => {
                self.messages.append(&mut self.storage, Message::bot(reply))?;
                Ok(Outcome::Completed)
            }
            Err(e) => {
                tracing::error!(error = %e, session_id = %pending.session_id, "chat request failed");
                self.error = Some(SEND_FAILED.to_string());
                Err(e)
            }
        }
    }

    pub(crate) fn send(&mut self, text: &str) -> Result<Outcome, ChatError> {
        let Some(pending) = self.begin_send(text)? else {
            return Ok(Outcome::Skipped);
        };
        let result = self.api.send_message(&pending.request());
        self.finish_send(pending, result)
    }

    pub(crate) fn begin_load(&mut self, session_id: &str) -> Result<Option<PendingLoad>, ChatError> {
        if self.is_busy() {
            return Ok(None);
        }
        let user_id = self.require_user()?;
        let token = self.start(Operation::LoadingHistory);
        Ok(Some(PendingLoad {
            token,
            session_id: session_id.to_string(),
            user_id,
        }))
    }

    pub(crate) fn finish_load(
        &mut self,
        pending: PendingLoad,
        result: Result<Vec<Message>, ChatError>,
    ) -> Result<Outcome, ChatError> {
        if !self.settle(pending.token) {
            return Ok(Outcome::Discarded);
        }
        match result {
            Ok(messages) => {
                let title = self
                    .history
                    .find(&pending.session_id)
                    .map(|s| s.title.clone())
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string());
                self.messages
                    .replace_all(&mut self.storage, messages, self.profile.display_name())?;
                self.session
                    .adopt(&mut self.storage, &pending.session_id, &title)?;
                self.history_open = false;
                self.error = None;
                Ok(Outcome::Completed)
            }
            Err(e) => {
                tracing::error!(error = %e, session_id = %pending.session_id, "loading chat failed");
                self.error = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Replace the transcript with a stored session from the backend
    pub(crate) fn load_history(&mut self, session_id: &str) -> Result<Outcome, ChatError> {
        let Some(pending) = self.begin_load(session_id)? else {
            return Ok(Outcome::Skipped);
        };
        let result = self
            .history
            .load_session(&self.api, pending.session_id(), pending.user_id());
        self.finish_load(pending, result)
    }

    /// Fetch the session list; on failure the previous list is kept
    pub(crate) fn fetch_history(&mut self) -> Result<&[SessionSummary], ChatError> {
        let Some(user_id) = self.profile.user_id() else {
            tracing::warn!("skipping history fetch: user not authenticated");
            return Err(ChatError::AuthRequired);
        };
        if let Err(e) = self.history.fetch_sessions(&self.api, user_id) {
            tracing::error!(error = %e, "fetching chat history failed");
            self.error = Some(HISTORY_FAILED.to_string());
            return Err(e);
        }
        self.error = None;
        Ok(self.history.sessions())
    }

    /// Open or close the history panel; opening it refreshes the list
    pub(crate) fn toggle_history(&mut self) -> Result<bool, ChatError> {
        self.history_open = !self.history_open;
        if self.history_open {
            self.fetch_history()?;
        }
        Ok(self.history_open)
    }

    /// Start a new conversation; any in-flight request is superseded
    pub(crate) fn refresh(&mut self) -> Result<(), ChatError> {
        if self.is_busy() {
            tracing::debug!(current = ?self.operation, "refresh supersedes in-flight request");
        }
        self.operation = Operation::Idle;
        self.session.refresh(&mut self.storage)?;
        self.messages
            .reset(&mut self.storage, self.profile.display_name())?;
        self.history_open = false;
        self.error = None;
        Ok(())
    }

    /// Plain-text transcript for sharing, one blank line between turns
    pub(crate) fn share_transcript(&self) -> Result<String, ChatError> {
        if self.messages.len() <= 1 {
            return Err(ChatError::NothingToShare);
        }
        let name = self.profile.display_name();
        Ok(self
            .messages()
            .iter()
            .map(|m| m.labelled(name))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
