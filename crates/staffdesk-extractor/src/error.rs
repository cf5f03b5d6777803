//! Error types for document extraction

use thiserror::Error;

/// Errors that can occur while pulling text or tables out of a document
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Slide-deck archive is unreadable
    #[error("Archive error: {0}")]
    Archive(String),

    /// Slide XML part is malformed
    #[error("Slide XML error: {0}")]
    Xml(String),

    /// PDF document is unreadable
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The correction completion failed mid-extraction
    #[error("Correction error: {0}")]
    Correction(String),
}
