use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("No chat session matches \"{reference}\"")]
    UnknownSession { reference: String },

    #[error("Could not determine a data directory; pass --data-dir or set MEDIBOT_HOME")]
    NoDataDir,

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Already phrased for the user
    #[error("{0}")]
    Failed(String),

    #[error("Line editor error: {0}")]
    Readline(String),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Chat(#[from] ChatError),
}

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode storage: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub(crate) enum ChatError {
    #[error("User not authenticated. Please log in again.")]
    AuthRequired,

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Unrecognized chat payload")]
    UnexpectedPayload,

    #[error("Start a conversation first before sharing!")]
    NothingToShare,

    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl From<ureq::Error> for ChatError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => ChatError::Http { status },
            ureq::Error::Json(e) => ChatError::Decode(e.to_string()),
            other => ChatError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_timezone() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn app_error_display_unknown_session() {
        let e = AppError::UnknownSession {
            reference: "7".to_string(),
        };
        assert_eq!(e.to_string(), r#"No chat session matches "7""#);
    }

    #[test]
    fn chat_error_auth_required() {
        assert_eq!(
            ChatError::AuthRequired.to_string(),
            "User not authenticated. Please log in again."
        );
    }

    #[test]
    fn chat_error_http_status() {
        let e = ChatError::Http { status: 500 };
        assert_eq!(e.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn chat_error_from_status_code() {
        let e: ChatError = ureq::Error::StatusCode(404).into();
        assert!(matches!(e, ChatError::Http { status: 404 }));
    }

    #[test]
    fn app_error_from_chat_error() {
        let app: AppError = ChatError::NothingToShare.into();
        assert_eq!(
            app.to_string(),
            "Start a conversation first before sharing!"
        );
    }
}
