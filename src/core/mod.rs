//! Chat core: session identity, transcript, history and the request flow

mod flow;
mod history;
mod messages;
mod profile;
mod session;
mod types;

pub(crate) use flow::{ChatController, Outcome};
pub(crate) use profile::Profile;
pub(crate) use types::{Message, Sender, SessionSummary};
