//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Infrastructure implementations live in other crates.

use crate::Table;
use async_trait::async_trait;
use std::path::Path;

/// Trait for chat-completion backends
///
/// Implemented by the infrastructure layer (staffdesk-llm)
#[async_trait]
pub trait CompletionBackend {
    /// Error type for completion operations
    type Error;

    /// Request a completion for a single user prompt
    async fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for pulling text and tables out of documents
///
/// Implemented by the application layer (staffdesk-extractor)
#[async_trait]
pub trait DocumentSource {
    /// Error type for extraction operations
    type Error;

    /// Extract the plain text of a slide-deck document
    ///
    /// Asynchronous because extraction runs each text fragment through a
    /// correction completion.
    async fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;

    /// Extract zero or more tables from a tabular (PDF) document
    fn extract_tables(&self, path: &Path) -> Result<Vec<Table>, Self::Error>;
}
