//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] staffdesk_store::StoreError),

    /// Batch review error
    #[error("Batch error: {0}")]
    Batch(#[from] staffdesk_batch::BatchError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
