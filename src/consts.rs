/// Title every session starts with until the first user message names it
pub(crate) const DEFAULT_TITLE: &str = "New Chat";

/// Display name used when the profile carries no `Name`
pub(crate) const DEFAULT_USER_NAME: &str = "User";

/// Speaker label for bot turns in transcripts
pub(crate) const BOT_NAME: &str = "MediBot";

/// Derived titles keep this many characters before the ellipsis
pub(crate) const TITLE_MAX_CHARS: usize = 30;

pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

pub(crate) const HISTORY_PREVIEW_FALLBACK: &str = "Click to view chat";

/// Shown in place of a session date the backend did not provide
pub(crate) const UNKNOWN_DATE: &str = "Unknown date";

/// Storage keys shared with the login collaborator and the chat core
pub(crate) mod keys {
    pub(crate) const NAME: &str = "Name";
    pub(crate) const EMAIL: &str = "Email";
    pub(crate) const MESSAGES: &str = "chatMessages";
    pub(crate) const SESSION_ID: &str = "chatSessionId";
    pub(crate) const SESSION_TITLE: &str = "chatSessionTitle";
}
