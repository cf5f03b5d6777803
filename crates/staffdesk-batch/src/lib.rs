//! Staffdesk Batch Review
//!
//! Reviews a directory of slide-deck CVs against a set of hiring listings,
//! composing the document extractor and the completion backend directly
//! (no intent routing involved). Produces a nested
//! `document -> listing -> verdict` result and a renderable report.

pub mod error;
pub mod reviewer;

pub use error::BatchError;
pub use reviewer::{BatchOutcome, BatchReviewer, Listing};
