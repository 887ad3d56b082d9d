mod format;
mod history;
mod transcript;

pub(crate) use history::{output_history_json, print_history_table};
pub(crate) use transcript::{format_message, output_transcript_json, print_transcript};
