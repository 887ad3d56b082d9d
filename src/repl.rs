//! Interactive chat loop

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::api::ChatApi;
use crate::app::{resolve_session, user_facing};
use crate::core::{ChatController, Outcome};
use crate::error::AppError;
use crate::output::{format_message, print_history_table, print_transcript};
use crate::storage::Storage;

const HELP: &str = "\
Commands:
  /new            start a new chat
  /history        show or hide previous chats
  /load <N|ID>    open a previous chat by list number or id
  /show           print the current conversation
  /share          print the conversation as plain text
  /help           show this help
  /quit           leave (also: exit, Ctrl-D)
Anything else is sent to MediBot.";

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Empty,
    Message(String),
    New,
    History,
    Load(String),
    Share,
    Show,
    Help,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        return ReplCommand::Quit;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Message(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name.to_ascii_lowercase().as_str() {
        "new" => ReplCommand::New,
        "history" => ReplCommand::History,
        "load" if !arg.is_empty() => ReplCommand::Load(arg.to_string()),
        "share" => ReplCommand::Share,
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(trimmed.to_string()),
    }
}

fn print_reply<S: Storage, A: ChatApi>(chat: &ChatController<S, A>) {
    if let Some(reply) = chat.messages().last() {
        println!("{}\n", format_message(reply, chat.profile().display_name()));
    }
}

fn print_sessions<S: Storage, A: ChatApi>(chat: &ChatController<S, A>, use_color: bool) {
    print_history_table(chat.sessions(), chat.session_id(), use_color);
}

pub(crate) fn run_repl<S: Storage, A: ChatApi>(
    chat: &mut ChatController<S, A>,
    use_color: bool,
) -> Result<(), AppError> {
    let mut editor = DefaultEditor::new().map_err(|e| AppError::Readline(e.to_string()))?;

    print_transcript(chat.title(), chat.messages(), chat.profile().display_name());
    println!("Type /help for commands.\n");

    loop {
        let prompt = if chat.history_open() { "history> " } else { "> " };
        match editor.readline(prompt) {
            Ok(line) => {
                let command = parse_line(&line);
                if !matches!(command, ReplCommand::Empty) {
                    let _ = editor.add_history_entry(line.as_str());
                }

                match command {
                    ReplCommand::Empty => {}
                    ReplCommand::Quit => break,
                    ReplCommand::Help => println!("{HELP}\n"),
                    ReplCommand::Message(text) => {
                        chat.set_input(text);
                        match chat.submit() {
                            Ok(Outcome::Completed) => print_reply(chat),
                            Ok(Outcome::Skipped | Outcome::Discarded) => {}
                            Err(e) => eprintln!("{}\n", user_facing(chat, &e)),
                        }
                    }
                    ReplCommand::New => match chat.refresh() {
                        Ok(()) => print_transcript(
                            chat.title(),
                            chat.messages(),
                            chat.profile().display_name(),
                        ),
                        Err(e) => eprintln!("{}\n", user_facing(chat, &e)),
                    },
                    ReplCommand::History => match chat.toggle_history() {
                        Ok(true) => print_sessions(chat, use_color),
                        Ok(false) => println!("History closed.\n"),
                        Err(e) => eprintln!("{}\n", user_facing(chat, &e)),
                    },
                    ReplCommand::Load(reference) => {
                        let loaded = resolve_session(chat, &reference)
                            .and_then(|session_id| chat.load_history(&session_id));
                        match loaded {
                            Ok(Outcome::Completed) => print_transcript(
                                chat.title(),
                                chat.messages(),
                                chat.profile().display_name(),
                            ),
                            Ok(_) => {}
                            Err(e) => eprintln!("{}\n", user_facing(chat, &e)),
                        }
                    }
                    ReplCommand::Show => print_transcript(
                        chat.title(),
                        chat.messages(),
                        chat.profile().display_name(),
                    ),
                    ReplCommand::Share => match chat.share_transcript() {
                        Ok(transcript) => println!("{transcript}\n"),
                        Err(e) => eprintln!("{e}\n"),
                    },
                    ReplCommand::Unknown(input) => {
                        eprintln!("Unknown command: {input} (try /help)\n");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(AppError::Readline(err.to_string())),
        }
    }

    println!("Goodbye!");
    Ok(())
}
