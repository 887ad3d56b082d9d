use comfy_table::{Cell, Color};

use crate::core::SessionSummary;

use super::format::{create_styled_table, ellipsize, header_cell, styled_cell, to_json};

const PREVIEW_WIDTH: usize = 40;

pub(crate) fn print_history_table(sessions: &[SessionSummary], current_id: &str, use_color: bool) {
    if sessions.is_empty() {
        println!("No previous chats found.");
        return;
    }

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", use_color),
        header_cell("Title", use_color),
        header_cell("Date", use_color),
        header_cell("Preview", use_color),
    ]);

    let highlight = if use_color { Some(Color::Green) } else { None };

    for (i, session) in sessions.iter().enumerate() {
        let is_current = session.id == current_id;
        let marker = if is_current {
            format!("{}*", i + 1)
        } else {
            (i + 1).to_string()
        };
        let color = if is_current { highlight } else { None };
        table.add_row(vec![
            styled_cell(&marker, color, is_current),
            styled_cell(&session.title, color, is_current),
            Cell::new(&session.date),
            Cell::new(ellipsize(&session.preview, PREVIEW_WIDTH)),
        ]);
    }

    println!("\n  Chat History\n");
    println!("{table}");
    println!("\n  {} sessions (* = current)\n", sessions.len());
}

pub(crate) fn output_history_json(sessions: &[SessionSummary], current_id: &str) -> String {
    let output: Vec<serde_json::Value> = sessions
        .iter()
        .map(|session| {
            let mut obj = serde_json::to_value(session).unwrap_or_default();
            obj["current"] = serde_json::json!(session.id == current_id);
            obj
        })
        .collect();
    to_json(&output, "[]")
}
