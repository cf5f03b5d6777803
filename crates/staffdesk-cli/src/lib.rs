//! Staffdesk CLI library.
//!
//! The interactive chat shell over the intent-routing core: configuration
//! store with a JSON on-disk mirror, the foreground/background chat
//! session, the REPL, and output formatting.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::{Config, ConfigStore};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::{ChatEvent, ChatSession};
