//! API configuration held by the completion client.

use serde::{Deserialize, Serialize};

/// Default completion endpoint.
pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

/// Parameters for the chat-completion endpoint.
///
/// Read once at client construction; a constructed [`crate::ChatClient`]
/// does not observe later configuration changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint base URL (the `/chat/completions` path is appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer credential. Empty means unauthenticated.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier to request.
    #[serde(default)]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling parameter.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Completion length cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whether to request a streamed (chunked) response.
    #[serde(default = "default_stream")]
    pub stream: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: String::new(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            stream: default_stream(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_top_p() -> f32 {
    1.0
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_stream() -> bool {
    true
}
