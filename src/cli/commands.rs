//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Send one message and print the reply
    Send {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Start a new conversation
    New,
    /// List previous conversations
    History,
    /// Load a previous conversation by list number or session id
    Load {
        /// 1-based position from `history`, or a session id
        session: String,
    },
    /// Print the current conversation
    Show,
    /// Export the conversation as plain text
    Share {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Store the profile used to talk to the backend
    Login {
        /// Account email (the backend's user id)
        #[arg(long)]
        email: String,
        /// Display name used in greetings and transcripts
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the stored profile
    Logout,
}
