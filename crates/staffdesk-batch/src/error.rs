//! Error types for batch review

use thiserror::Error;

/// Errors that can occur during a batch review run
#[derive(Error, Debug)]
pub enum BatchError {
    /// The directory held no eligible documents
    #[error("No valid CV files found in directory")]
    NoDocuments,

    /// Directory enumeration failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be extracted
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A completion call failed
    #[error("Completion error: {0}")]
    Completion(String),
}
