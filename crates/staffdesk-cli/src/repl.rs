//! Interactive chat REPL.
//!
//! Plain input is sent to the conversation; `/`-prefixed input runs a shell
//! command. A sent message returns the prompt immediately; the reply is
//! printed when its worker finishes, at the next interaction (an empty
//! Enter refreshes).

use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::ChatSession;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use staffdesk_domain::traits::{CompletionBackend, DocumentSource};
use staffdesk_domain::UploadSlot;
use staffdesk_llm::{fetch_available_models, ApiConfig};
use staffdesk_store::FileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the REPL needs to serve one conversation.
pub struct ReplContext<L, D> {
    /// The conversation session.
    pub session: ChatSession<L, D>,
    /// Upload/artifact storage.
    pub files: Arc<FileStore>,
    /// The upload handoff consumed by document handlers.
    pub slot: Arc<UploadSlot>,
    /// API parameters (used by the advisory models listing).
    pub api: ApiConfig,
    /// How many messages to show on startup and for bare `/history`.
    pub history_limit: usize,
}

/// Run the interactive chat loop.
pub async fn run_repl<L, D>(ctx: &mut ReplContext<L, D>, formatter: &Formatter) -> Result<()>
where
    L: CompletionBackend + Send + Sync + 'static,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync + 'static,
    D::Error: std::fmt::Display + Send,
{
    println!(
        "{}",
        formatter.info("Staffdesk chat - type /help for commands, /quit to exit")
    );
    println!();

    load_existing_messages(ctx, formatter);

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to initialize editor: {}", e),
        ))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        // Completed replies are applied here, on the foreground, as one
        // unit each: print, clear typing status, persist.
        drain_events(ctx, formatter);

        let prompt = if ctx.session.pending() > 0 {
            "you (agent is typing...)> "
        } else {
            "you> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();

                if let Some(command) = line.strip_prefix('/') {
                    match execute_command(command, ctx, formatter).await {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    }
                } else {
                    ctx.session
                        .send(line, |m| println!("{}", formatter.message(m)));
                    println!("{}", formatter.status("Agent is typing..."));
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use /quit to exit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

/// Apply every queued reply without waiting.
fn drain_events<L, D>(ctx: &mut ReplContext<L, D>, formatter: &Formatter)
where
    L: CompletionBackend + Send + Sync + 'static,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync + 'static,
    D::Error: std::fmt::Display + Send,
{
    while let Some(event) = ctx.session.try_next_event() {
        ctx.session
            .apply(event, |m| println!("{}", formatter.message(m)));
    }
}

/// Print the tail of the persisted conversation on startup.
fn load_existing_messages<L, D>(ctx: &ReplContext<L, D>, formatter: &Formatter)
where
    L: CompletionBackend + Send + Sync + 'static,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync + 'static,
    D::Error: std::fmt::Display + Send,
{
    match ctx.session.log().read_recent(ctx.history_limit) {
        Ok(messages) => {
            for message in &messages {
                println!("{}", formatter.message(message));
            }
            if !messages.is_empty() {
                println!();
            }
        }
        Err(e) => eprintln!(
            "{}",
            formatter.error(&format!("Failed to load existing messages: {}", e))
        ),
    }
}

/// Execute a `/command`; returns `true` when the REPL should exit.
async fn execute_command<L, D>(
    command: &str,
    ctx: &mut ReplContext<L, D>,
    formatter: &Formatter,
) -> Result<bool>
where
    L: CompletionBackend + Send + Sync + 'static,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync + 'static,
    D::Error: std::fmt::Display + Send,
{
    let parts: Vec<&str> = command.split_whitespace().collect();
    match parts.first().copied() {
        Some("quit") | Some("exit") | Some("q") => {
            println!("{}", formatter.info("Goodbye!"));
            return Ok(true);
        }
        Some("help") | Some("?") => print_help(formatter),
        Some("upload") => {
            let Some(path) = parts.get(1) else {
                return Err(CliError::InvalidInput("Usage: /upload <file>".to_string()));
            };
            let (file_name, stored) = ctx.files.ingest(Path::new(path))?;
            ctx.slot.deposit(stored);
            ctx.session
                .record_system(&format!("File uploaded: {}", file_name), |m| {
                    println!("{}", formatter.message(m))
                });
        }
        Some("download") => {
            let (Some(source), Some(dest)) = (parts.get(1), parts.get(2)) else {
                return Err(CliError::InvalidInput(
                    "Usage: /download <stored-file> <dest-dir>".to_string(),
                ));
            };
            let target = ctx.files.export(Path::new(source), Path::new(dest))?;
            println!(
                "{}",
                formatter.info(&format!("File saved to: {}", target.display()))
            );
        }
        Some("models") => {
            let models = fetch_available_models(&ctx.api.base_url, &ctx.api.api_key).await;
            if models.is_empty() {
                println!("{}", formatter.info("No models available."));
            } else {
                for model in models {
                    println!("  {}", model);
                }
            }
        }
        Some("history") => {
            let limit = parts
                .get(1)
                .map(|n| {
                    n.parse::<usize>().map_err(|_| {
                        CliError::InvalidInput("Usage: /history [count]".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(ctx.history_limit);
            for message in ctx.session.log().read_recent(limit)? {
                println!("{}", formatter.message(&message));
            }
        }
        _ => {
            return Err(CliError::InvalidInput(format!(
                "Unknown command: /{}. Type /help for available commands.",
                parts.first().copied().unwrap_or_default()
            )));
        }
    }

    Ok(false)
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let staffdesk_dir = home.join(".staffdesk");
    std::fs::create_dir_all(&staffdesk_dir)?;
    Ok(staffdesk_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  /upload <file>                  - Upload a document for the next request");
    println!("  /download <stored-file> <dir>   - Copy a stored file out under its original name");
    println!("  /models                         - List models available at the endpoint");
    println!("  /history [count]                - Reprint recent conversation history");
    println!("  /help, /?                       - Show this help");
    println!("  /quit, /exit, /q                - Exit");
    println!();
    println!("Anything else is sent to the assistant. Keywords select an action:");
    println!("  'create listing', 'review', 'batch process', 'spell/grammar', 'table analysis'");
    println!("Replies print as soon as they are ready; press Enter on an empty line to refresh.");
    println!();
}
