//! Command-line argument definitions.
//!
//! Every API override given on the command line is written back into the
//! configuration store before the selected command runs, so a flag used
//! once persists for later sessions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Staffdesk: staffing helper chat assistant.
#[derive(Debug, Parser)]
#[command(name = "staffdesk", version, about = "Staffing helper chat assistant")]
pub struct Cli {
    /// API base URL override
    #[arg(long, env = "STAFFDESK_BASE_URL")]
    pub base_url: Option<String>,

    /// API key override
    #[arg(long, env = "STAFFDESK_API_KEY")]
    pub api_key: Option<String>,

    /// Model name override
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature override
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Top-p override
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Max-tokens override
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Stream responses (true/false)
    #[arg(long)]
    pub stream: Option<bool>,

    /// Storage directory for conversation logs and uploads
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Command to run (interactive chat when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (default)
    Chat,

    /// List the models available at the configured endpoint
    Models,

    /// Review every CV in a directory and write a report
    Batch {
        /// Directory holding the CV documents
        directory: PathBuf,
    },
}
