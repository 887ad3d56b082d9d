use std::path::{Path, PathBuf};

use crate::api::{ChatApi, HttpChatApi};
use crate::cli::{Cli, Commands};
use crate::core::{ChatController, Outcome, Profile};
use crate::error::{AppError, ChatError};
use crate::output::{
    format_message, output_history_json, output_transcript_json, print_history_table,
    print_transcript,
};
use crate::repl::run_repl;
use crate::storage::{FileStorage, Storage};
use crate::utils::Timezone;

const LOGIN_HINT: &str = "Run `medibot login --email <EMAIL>` to sign in.";

/// Turn a failed chat operation into the message shown to the user
pub(crate) fn user_facing<S: Storage, A: ChatApi>(
    chat: &ChatController<S, A>,
    err: &ChatError,
) -> String {
    let message = chat
        .error()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    if matches!(err, ChatError::AuthRequired) {
        format!("{message}\n{LOGIN_HINT}")
    } else {
        message
    }
}

fn failure<S: Storage, A: ChatApi>(chat: &ChatController<S, A>, err: ChatError) -> AppError {
    AppError::Failed(user_facing(chat, &err))
}

/// Resolve a list position or id, refreshing the history list first
pub(crate) fn resolve_session<S: Storage, A: ChatApi>(
    chat: &mut ChatController<S, A>,
    reference: &str,
) -> Result<String, ChatError> {
    if let Err(e) = chat.fetch_history() {
        if matches!(e, ChatError::AuthRequired) {
            return Err(e);
        }
        tracing::warn!(error = %e, "history unavailable, treating reference as a session id");
    }
    Ok(chat
        .resolve_session(reference)
        .map(|s| s.id.clone())
        .unwrap_or_else(|| reference.trim().to_string()))
}

fn open_chat(
    storage: FileStorage,
    cli: &Cli,
    timezone: Timezone,
) -> Result<ChatController<FileStorage, HttpChatApi>, AppError> {
    let api = HttpChatApi::new(cli.api_url(), cli.timeout());
    Ok(ChatController::new(storage, api, timezone)?)
}

fn handle_send<S: Storage, A: ChatApi>(
    chat: &mut ChatController<S, A>,
    text: &str,
    json: bool,
) -> Result<(), AppError> {
    match chat.send(text) {
        Ok(Outcome::Completed) => {
            if let Some(reply) = chat.messages().last() {
                if json {
                    println!("{}", output_transcript_json(chat.session_id(), chat.title(), &[reply.clone()]));
                } else {
                    println!("{}", format_message(reply, chat.profile().display_name()));
                }
            }
            Ok(())
        }
        Ok(Outcome::Skipped) => {
            eprintln!("Nothing to send.");
            Ok(())
        }
        Ok(Outcome::Discarded) => Ok(()),
        Err(e) => Err(failure(chat, e)),
    }
}

fn handle_history<S: Storage, A: ChatApi>(
    chat: &mut ChatController<S, A>,
    json: bool,
    use_color: bool,
) -> Result<(), AppError> {
    if let Err(e) = chat.fetch_history() {
        return Err(failure(chat, e));
    }
    if json {
        println!("{}", output_history_json(chat.sessions(), chat.session_id()));
    } else {
        print_history_table(chat.sessions(), chat.session_id(), use_color);
    }
    Ok(())
}

fn handle_load<S: Storage, A: ChatApi>(
    chat: &mut ChatController<S, A>,
    reference: &str,
    json: bool,
) -> Result<(), AppError> {
    let session_id = match resolve_session(chat, reference) {
        Ok(id) => id,
        Err(e) => return Err(failure(chat, e)),
    };
    if session_id.is_empty() {
        return Err(AppError::UnknownSession {
            reference: reference.to_string(),
        });
    }
    if let Err(e) = chat.load_history(&session_id) {
        return Err(failure(chat, e));
    }
    handle_show(chat, json);
    Ok(())
}

fn handle_show<S: Storage, A: ChatApi>(chat: &ChatController<S, A>, json: bool) {
    if json {
        println!(
            "{}",
            output_transcript_json(chat.session_id(), chat.title(), chat.messages())
        );
    } else {
        print_transcript(chat.title(), chat.messages(), chat.profile().display_name());
        println!("  session {}", chat.session_id());
    }
}

fn handle_new<S: Storage, A: ChatApi>(
    chat: &mut ChatController<S, A>,
    json: bool,
) -> Result<(), AppError> {
    chat.refresh()?;
    if json {
        handle_show(chat, true);
    } else {
        println!("Started a new chat ({})", chat.session_id());
    }
    Ok(())
}

fn handle_share<S: Storage, A: ChatApi>(
    chat: &ChatController<S, A>,
    output: Option<&Path>,
) -> Result<(), AppError> {
    let transcript = chat.share_transcript().map_err(|e| failure(chat, e))?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{transcript}\n")).map_err(|source| AppError::Output {
                path: path.to_path_buf(),
                source,
            })?;
            println!("Conversation written to {}", path.display());
        }
        None => println!("{transcript}"),
    }
    Ok(())
}

fn handle_login(
    storage: &mut FileStorage,
    email: &str,
    name: Option<&str>,
) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Failed("Email must not be empty.".to_string()));
    }
    let profile = Profile::save(storage, email, name)?;
    println!(
        "Signed in as {} ({})",
        profile.display_name(),
        profile.user_id().unwrap_or_default()
    );
    Ok(())
}

pub(crate) fn run(cli: Cli) -> Result<(), AppError> {
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let data_dir: PathBuf = cli.data_dir().ok_or(AppError::NoDataDir)?;
    tracing::debug!(data_dir = %data_dir.display(), api_url = cli.api_url(), "starting");
    let mut storage = FileStorage::open(&data_dir);

    match cli.command.clone().unwrap_or(Commands::Chat) {
        Commands::Login { email, name } => handle_login(&mut storage, &email, name.as_deref()),
        Commands::Logout => {
            Profile::clear(&mut storage)?;
            println!("Signed out.");
            Ok(())
        }
        Commands::Chat => {
            let mut chat = open_chat(storage, &cli, timezone)?;
            run_repl(&mut chat, cli.use_color())
        }
        Commands::Send { text } => {
            let mut chat = open_chat(storage, &cli, timezone)?;
            handle_send(&mut chat, &text.join(" "), cli.json)
        }
        Commands::New => {
            let mut chat = open_chat(storage, &cli, timezone)?;
            handle_new(&mut chat, cli.json)
        }
        Commands::History => {
            let mut chat = open_chat(storage, &cli, timezone)?;
            handle_history(&mut chat, cli.json, cli.use_color())
        }
        Commands::Load { session } => {
            let mut chat = open_chat(storage, &cli, timezone)?;
            handle_load(&mut chat, &session, cli.json)
        }
        Commands::Show => {
            let chat = open_chat(storage, &cli, timezone)?;
            handle_show(&chat, cli.json);
            Ok(())
        }
        Commands::Share { output } => {
            let chat = open_chat(storage, &cli, timezone)?;
            handle_share(&chat, output.as_deref())
        }
    }
}
