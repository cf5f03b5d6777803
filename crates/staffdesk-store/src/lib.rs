//! Staffdesk Storage Layer
//!
//! Plain-text persistence for the chat assistant:
//!
//! - [`ConversationLog`]: one append-only UTF-8 file per calendar day with
//!   a line-tagged message grammar that parses back into structured
//!   messages, including recovery of a message whose end marker never made
//!   it to disk
//! - [`FileStore`]: uploaded-file ingestion under timestamped unique
//!   names, corrected-text artifacts, and batch report files
//!
//! # Examples
//!
//! ```no_run
//! use staffdesk_store::ConversationLog;
//! use staffdesk_domain::{Message, Sender};
//!
//! let log = ConversationLog::new("chats_data").unwrap();
//! log.append(&Message::now(Sender::User, "hello")).unwrap();
//! let recent = log.read_recent(250).unwrap();
//! ```

#![warn(missing_docs)]

pub mod files;
pub mod log;

use thiserror::Error;

pub use files::FileStore;
pub use log::ConversationLog;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path without a usable file name was supplied
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
