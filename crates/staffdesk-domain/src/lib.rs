//! Staffdesk Domain Layer
//!
//! This crate contains the core types and trait interfaces for Staffdesk.
//! It carries almost no dependencies and defines the fundamental concepts
//! that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Message**: one conversational turn (sender, timestamp, content lines)
//! - **Table**: a header + rows value extracted from a tabular document
//! - **UploadSlot**: single-owner handoff of the currently uploaded file
//! - **Traits**: seams for the completion backend and document extraction;
//!   infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod message;
pub mod table;
pub mod traits;
pub mod upload;

// Re-exports for convenience
pub use message::{Message, Sender};
pub use table::Table;
pub use upload::{UploadSlot, UploadToken};
