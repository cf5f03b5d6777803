//! Staffdesk - staffing helper chat assistant.

use clap::Parser;
use staffdesk_batch::BatchReviewer;
use staffdesk_cli::repl::{self, ReplContext};
use staffdesk_cli::{ChatSession, Cli, Command, ConfigStore, Formatter};
use staffdesk_domain::UploadSlot;
use staffdesk_extractor::Extractor;
use staffdesk_llm::{fetch_available_models, ChatClient};
use staffdesk_router::IntentRouter;
use staffdesk_store::{ConversationLog, FileStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> staffdesk_cli::Result<()> {
    // Log to stderr so chat output stays clean; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut store = ConfigStore::open(ConfigStore::default_path()?)?;
    store.apply_cli_args(&cli)?;
    let config = store.config()?.clone();

    let formatter = Formatter::new(!cli.no_color);
    let storage_dir = PathBuf::from(&config.app.storage_dir);

    match cli.command {
        None | Some(Command::Chat) => {
            let backend = Arc::new(ChatClient::new(config.api.clone()));
            let documents = Arc::new(Extractor::new(Arc::clone(&backend)));
            let slot = Arc::new(UploadSlot::new());
            let files = Arc::new(FileStore::new(&storage_dir)?);
            let log = Arc::new(ConversationLog::new(&storage_dir)?);

            let router = IntentRouter::new(
                Arc::clone(&backend),
                documents,
                Arc::clone(&slot),
                Arc::clone(&files),
            );

            let mut ctx = ReplContext {
                session: ChatSession::new(Arc::new(router), log),
                files,
                slot,
                api: config.api.clone(),
                history_limit: config.app.history_limit,
            };
            repl::run_repl(&mut ctx, &formatter).await?;
        }
        Some(Command::Models) => {
            let models = fetch_available_models(&config.api.base_url, &config.api.api_key).await;
            if models.is_empty() {
                println!("{}", formatter.info("No models available."));
            } else {
                for model in models {
                    println!("{}", model);
                }
            }
        }
        Some(Command::Batch { directory }) => {
            let backend = Arc::new(ChatClient::new(config.api.clone()));
            let documents = Arc::new(Extractor::new(Arc::clone(&backend)));
            let reviewer = BatchReviewer::new(backend, documents);

            let outcome = reviewer.process_batch(&directory, None).await?;

            let files = FileStore::new(&storage_dir)?;
            let path = files.save_batch_report(&outcome.render_report())?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            println!("Batch processing completed. Results saved to {}", file_name);
        }
    }

    Ok(())
}
