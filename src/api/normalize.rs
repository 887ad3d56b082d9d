//! Normalization of backend payloads into display types
//!
//! Precedence rules:
//! - session id: `id`, then `sessionId` (strings or numbers; blank counts as absent)
//! - session time: `timestamp`, then `createdAt` (epoch millis or RFC 3339)
//! - title: `title`, then `"Chat {date}"`
//! - message text: `content`, then `text`; sender: `role`, then `sender`
//!
//! Records are decoded one at a time. A record that is not an object is
//! skipped with a warning; the rest of the response is still used.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::consts::{HISTORY_PREVIEW_FALLBACK, UNKNOWN_DATE};
use crate::core::{Message, SessionSummary};
use crate::utils::Timezone;

use super::types::{ChatPayload, RawMessage, RawSession};

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(millis) = s.parse::<i64>() {
                return DateTime::from_timestamp_millis(millis);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        _ => None,
    }
}

/// Displayable text of a loosely typed field; blank counts as absent
fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // content parts: `["a", {"type":"text","text":"b"}]`
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(""),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

fn first_text(candidates: [&Option<Value>; 2]) -> Option<String> {
    candidates.into_iter().flatten().find_map(text_value)
}

fn decode_records<T: DeserializeOwned>(records: Vec<Value>, what: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(error = %e, %record, "skipping malformed {what}");
                None
            }
        })
        .collect()
}

/// Decode a `/api/sessions` body entry by entry
pub(crate) fn raw_sessions(records: Vec<Value>) -> Vec<RawSession> {
    decode_records(records, "history entry")
}

pub(super) fn normalize_session(raw: &RawSession, timezone: Timezone) -> Option<SessionSummary> {
    let id = [&raw.id, &raw.session_id]
        .into_iter()
        .flatten()
        .find_map(id_string)?;

    let date = [&raw.timestamp, &raw.created_at]
        .into_iter()
        .flatten()
        .find_map(parse_timestamp)
        .map(|ts| timezone.display_date(ts))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());

    let title = raw
        .title
        .as_ref()
        .and_then(text_value)
        .unwrap_or_else(|| format!("Chat {date}"));
    let preview = raw
        .preview
        .as_ref()
        .and_then(text_value)
        .unwrap_or_else(|| HISTORY_PREVIEW_FALLBACK.to_string());

    Some(SessionSummary {
        id,
        title,
        date,
        preview,
    })
}

/// Normalize a session list, dropping entries the backend sent without any id
pub(crate) fn normalize_sessions(raw: &[RawSession], timezone: Timezone) -> Vec<SessionSummary> {
    raw.iter()
        .filter_map(|session| {
            let summary = normalize_session(session, timezone);
            if summary.is_none() {
                tracing::warn!(?session, "skipping history entry without an id");
            }
            summary
        })
        .collect()
}

fn normalize_message(raw: RawMessage) -> Message {
    let text = first_text([&raw.content, &raw.text]).unwrap_or_default();
    let is_user = match raw.role.as_ref().and_then(Value::as_str) {
        Some(role) => role == "user",
        None => raw.sender.as_ref().and_then(Value::as_str) == Some("user"),
    };
    if is_user {
        Message::user(text)
    } else {
        Message::bot(text)
    }
}

pub(crate) fn normalize_messages(payload: ChatPayload) -> Vec<Message> {
    let records = match payload {
        ChatPayload::Wrapped { messages } => messages,
        ChatPayload::Bare(messages) => messages,
    };
    decode_records::<RawMessage>(records, "chat message")
        .into_iter()
        .map(normalize_message)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sender;

    fn utc() -> Timezone {
        Timezone::parse(Some("UTC")).unwrap()
    }

    fn raw(json: &str) -> RawSession {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn both_session_shapes_normalize_the_same() {
        let a = normalize_session(&raw(r#"{"sessionId":"s1","createdAt":1700000000000}"#), utc());
        let b = normalize_session(&raw(r#"{"id":"s1","timestamp":1700000000000}"#), utc());
        assert_eq!(a, b);

        let summary = a.unwrap();
        assert_eq!(summary.id, "s1");
        assert_eq!(summary.date, "11/14/2023");
        assert_eq!(summary.title, "Chat 11/14/2023");
        assert_eq!(summary.preview, "Click to view chat");
    }

    #[test]
    fn id_wins_over_session_id() {
        let summary =
            normalize_session(&raw(r#"{"id":"primary","sessionId":"secondary"}"#), utc()).unwrap();
        assert_eq!(summary.id, "primary");
    }

    #[test]
    fn blank_id_falls_through_to_session_id() {
        let summary =
            normalize_session(&raw(r#"{"id":"","sessionId":"secondary"}"#), utc()).unwrap();
        assert_eq!(summary.id, "secondary");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let summary = normalize_session(&raw(r#"{"id":42}"#), utc()).unwrap();
        assert_eq!(summary.id, "42");
    }

    #[test]
    fn timestamp_wins_over_created_at() {
        let summary = normalize_session(
            &raw(r#"{"id":"s","timestamp":"2024-03-01T12:00:00Z","createdAt":"2020-01-01T00:00:00Z"}"#),
            utc(),
        )
        .unwrap();
        assert_eq!(summary.date, "3/1/2024");
    }

    #[test]
    fn date_follows_timezone() {
        let tz = Timezone::parse(Some("America/New_York")).unwrap();
        let summary =
            normalize_session(&raw(r#"{"id":"s","timestamp":"2024-03-01T02:00:00Z"}"#), tz).unwrap();
        assert_eq!(summary.date, "2/29/2024");
    }

    #[test]
    fn string_millis_and_naive_times_parse() {
        let millis = normalize_session(&raw(r#"{"id":"s","createdAt":"1700000000000"}"#), utc());
        assert_eq!(millis.unwrap().date, "11/14/2023");

        let naive = normalize_session(&raw(r#"{"id":"s","createdAt":"2025-07-04T09:30:00.123"}"#), utc());
        assert_eq!(naive.unwrap().date, "7/4/2025");
    }

    #[test]
    fn missing_time_uses_unknown_date() {
        let summary = normalize_session(&raw(r#"{"id":"s","timestamp":"soon"}"#), utc()).unwrap();
        assert_eq!(summary.date, UNKNOWN_DATE);
        assert_eq!(summary.title, format!("Chat {UNKNOWN_DATE}"));
    }

    #[test]
    fn explicit_title_and_preview_are_kept() {
        let summary = normalize_session(
            &raw(r#"{"id":"s","title":"Migraine","preview":"It started on..."}"#),
            utc(),
        )
        .unwrap();
        assert_eq!(summary.title, "Migraine");
        assert_eq!(summary.preview, "It started on...");
    }

    #[test]
    fn sessions_without_id_are_dropped() {
        let list: Vec<RawSession> =
            serde_json::from_str(r#"[{"title":"orphan"},{"id":"keep"}]"#).unwrap();
        let summaries = normalize_sessions(&list, utc());
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "keep");
    }

    #[test]
    fn bare_role_content_records_map_to_messages() {
        let payload: ChatPayload = serde_json::from_str(
            r#"[{"role":"user","content":"my knee hurts"},{"role":"assistant","content":"Since when?"}]"#,
        )
        .unwrap();
        let messages = normalize_messages(payload);
        assert_eq!(
            messages,
            vec![Message::user("my knee hurts"), Message::bot("Since when?")]
        );
    }

    #[test]
    fn wrapped_sender_text_records_pass_through() {
        let payload: ChatPayload = serde_json::from_str(
            r#"{"messages":[{"text":"hello","sender":"user"},{"text":"hi","sender":"bot"}]}"#,
        )
        .unwrap();
        let messages = normalize_messages(payload);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].text, "hi");
    }

    #[test]
    fn empty_content_falls_back_to_text() {
        let payload: ChatPayload =
            serde_json::from_str(r#"[{"role":"user","content":"","text":"typed"}]"#).unwrap();
        assert_eq!(normalize_messages(payload), vec![Message::user("typed")]);
    }

    #[test]
    fn oddly_typed_title_and_preview_are_stringified() {
        let summary =
            normalize_session(&raw(r#"{"id":"b","title":42,"preview":{"x":1}}"#), utc()).unwrap();
        assert_eq!(summary.title, "42");
        assert_eq!(summary.preview, "Click to view chat");
    }

    #[test]
    fn one_bad_session_entry_does_not_drop_the_rest() {
        let records: Vec<Value> =
            serde_json::from_str(r#"[{"id":"a","title":"Good"},"garbage",{"id":"b","title":42}]"#)
                .unwrap();
        let summaries = normalize_sessions(&raw_sessions(records), utc());
        let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(summaries[0].title, "Good");
    }

    #[test]
    fn content_parts_are_joined() {
        let payload: ChatPayload = serde_json::from_str(
            r#"[{"role":"bot","content":["Rest ",{"type":"text","text":"and hydrate."}]}]"#,
        )
        .unwrap();
        assert_eq!(normalize_messages(payload), vec![Message::bot("Rest and hydrate.")]);
    }

    #[test]
    fn malformed_message_records_are_skipped() {
        let payload: ChatPayload = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"ok"},7,{"role":"bot","content":{"odd":true},"text":"fallback"}]}"#,
        )
        .unwrap();
        assert_eq!(
            normalize_messages(payload),
            vec![Message::user("ok"), Message::bot("fallback")]
        );
    }

    #[test]
    fn unknown_payload_shape_is_rejected() {
        assert!(serde_json::from_str::<ChatPayload>(r#"{"history":[]}"#).is_err());
        assert!(serde_json::from_str::<ChatPayload>(r#""nope""#).is_err());
    }

    #[test]
    fn empty_payloads_yield_no_messages() {
        let bare: ChatPayload = serde_json::from_str("[]").unwrap();
        let wrapped: ChatPayload = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert!(normalize_messages(bare).is_empty());
        assert!(normalize_messages(wrapped).is_empty());
    }
}
