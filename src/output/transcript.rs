use crate::core::Message;

use super::format::to_json;

pub(crate) fn format_message(message: &Message, user_name: &str) -> String {
    message.labelled(user_name)
}

pub(crate) fn print_transcript(title: &str, messages: &[Message], user_name: &str) {
    println!("\n  {title}\n");
    for message in messages {
        println!("{}\n", format_message(message, user_name));
    }
}

pub(crate) fn output_transcript_json(session_id: &str, title: &str, messages: &[Message]) -> String {
    let output = serde_json::json!({
        "session_id": session_id,
        "title": title,
        "messages": messages,
    });
    to_json(&output, "{}")
}
