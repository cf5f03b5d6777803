//! Staffdesk Completion Layer
//!
//! Client for an OpenAI-compatible chat-completion endpoint, plus the
//! prompt library used by every document-processing task.
//!
//! # Architecture
//!
//! This crate provides the concrete implementation of the
//! `CompletionBackend` trait from `staffdesk-domain`:
//!
//! - `ChatClient`: HTTP client with streamed-chunk accumulation
//! - `MockCompletion`: deterministic mock for testing
//!
//! The prompt builders in [`prompt`] are pure functions; they do no I/O and
//! produce byte-identical output for identical input.
//!
//! # Examples
//!
//! ```
//! use staffdesk_llm::MockCompletion;
//! use staffdesk_domain::traits::CompletionBackend;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let backend = MockCompletion::new("Hello from the model!");
//! let result = backend.complete("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from the model!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod prompt;

use async_trait::async_trait;
use staffdesk_domain::traits::CompletionBackend;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use client::{fetch_available_models, ChatClient, ChatTurn};
pub use config::ApiConfig;

/// Errors that can occur when talking to the completion endpoint
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status from the endpoint
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code returned by the endpoint
        status: u16,
        /// Response body, if it could be read
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("Completion error: {0}")]
    Other(String),
}

/// Mock completion backend for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use staffdesk_llm::MockCompletion;
/// use staffdesk_domain::traits::CompletionBackend;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mut backend = MockCompletion::default();
/// backend.add_response("prompt1", "response1");
/// assert_eq!(backend.complete("prompt1").await.unwrap(), "response1");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockCompletion {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockCompletion {
    /// Create a mock that answers every prompt with a fixed response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Configure an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), "ERROR".to_string());
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call counter
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    type Error = CompletionError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            if response == "ERROR" {
                return Err(CompletionError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}
