//! OpenAI-compatible chat-completion client.
//!
//! Request assembly, streamed-chunk accumulation and error surfacing for a
//! bearer-authenticated `/chat/completions` endpoint, plus the advisory
//! `/models` listing.
//!
//! Errors from the completion path are logged and returned to the caller;
//! this is the one boundary where a remote fault is not swallowed. Handlers
//! above this layer convert the error into user-visible text.

use crate::config::ApiConfig;
use crate::CompletionError;
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use staffdesk_domain::traits::CompletionBackend;
use tracing::{debug, error, info};

/// One turn in a chat-completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Message role (`user`, `system`, `assistant`).
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatTurn {
    /// Create a turn with an explicit role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a `user` turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Request body for the chat-completion endpoint
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

/// Full (non-streamed) completion response
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<ResponseChoice>,
}

#[derive(Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// One incremental chunk of a streamed response
#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Classification of one line of a streamed response body.
enum StreamEvent {
    /// A chunk carrying an optional content fragment (`None` = no delta).
    Delta(Option<String>),
    /// The `[DONE]` terminator.
    Done,
    /// Blank line, SSE comment, or a non-`data:` field.
    Ignored,
}

/// Parse one line of an SSE body into a stream event.
///
/// Lines that are not `data:` fields are ignored; a `data:` payload that is
/// not `[DONE]` must be a well-formed chunk.
fn parse_stream_line(line: &str) -> Result<StreamEvent, CompletionError> {
    let line = line.trim_end_matches('\r');
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(StreamEvent::Ignored);
    };
    let payload = payload.trim_start();

    if payload == "[DONE]" {
        return Ok(StreamEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(payload).map_err(|e| {
        CompletionError::InvalidResponse(format!("Failed to parse stream chunk: {}", e))
    })?;

    Ok(StreamEvent::Delta(
        chunk.choices.into_iter().next().and_then(|c| c.delta.content),
    ))
}

/// Client for a bearer-authenticated chat-completion endpoint.
///
/// Holds the API parameters it was constructed with; rebuilding the client
/// is the only way to pick up configuration changes.
pub struct ChatClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client from the held configuration.
    ///
    /// No request timeout is configured: a hung endpoint hangs only the
    /// worker awaiting it.
    pub fn new(config: ApiConfig) -> Self {
        debug!(
            "Model: {} Temperature: {} Top P: {} Max Tokens: {} Stream: {}",
            config.model, config.temperature, config.top_p, config.max_tokens, config.stream
        );
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Request a completion for a single `user` prompt.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.complete_as("user", prompt).await
    }

    /// Request a completion for a single prompt with an explicit role.
    pub async fn complete_as(&self, role: &str, prompt: &str) -> Result<String, CompletionError> {
        let messages = [ChatTurn::new(role, prompt)];
        self.complete_messages(&messages).await
    }

    /// Request a completion for a multi-turn message list.
    ///
    /// With streaming enabled, content fragments are accumulated across the
    /// chunk sequence in arrival order; with streaming disabled the same
    /// contract degenerates to reading one full response. Either way the
    /// final string is returned once the response ends.
    pub async fn complete_messages(&self, messages: &[ChatTurn]) -> Result<String, CompletionError> {
        info!("Calling completion endpoint {}", self.config.base_url);

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            stream: self.config.stream,
        };

        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body);

        let result = if self.config.stream {
            self.collect_streamed(request).await
        } else {
            self.collect_single(request).await
        };

        match &result {
            Ok(response) => debug!("Received response: {} chars", response.len()),
            Err(e) => error!("Error calling completion API: {}", e),
        }

        result
    }

    /// Synchronous wrapper over [`complete`](Self::complete).
    ///
    /// Prompt construction and accumulation are identical to the async path.
    /// Must not be called from within an async context.
    pub fn complete_blocking(&self, prompt: &str) -> Result<String, CompletionError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            CompletionError::Other(format!("Failed to start blocking runtime: {}", e))
        })?;
        runtime.block_on(self.complete(prompt))
    }

    /// Send the request and fail on transport errors or non-success status.
    async fn send_checked(
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, CompletionError> {
        let response = request
            .send()
            .await
            .map_err(|e| CompletionError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Read one full (non-streamed) response.
    async fn collect_single(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, CompletionError> {
        let response = Self::send_checked(request).await?;

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            CompletionError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("Response has no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }

    /// Accumulate content fragments across a streamed response.
    async fn collect_streamed(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, CompletionError> {
        let response = Self::send_checked(request).await?;

        let mut stream = response.bytes_stream();
        let mut pending = String::new();
        let mut accumulated = String::new();

        while let Some(item) = stream.next().await {
            let bytes = item
                .map_err(|e| CompletionError::Communication(format!("Stream error: {}", e)))?;
            pending.push_str(&String::from_utf8_lossy(&bytes));

            // SSE frames may be split across network chunks; only complete
            // lines are parsed, the tail stays buffered.
            while let Some(newline) = pending.find('\n') {
                let line: String = pending.drain(..=newline).collect();
                match parse_stream_line(line.trim_end_matches('\n'))? {
                    StreamEvent::Delta(Some(fragment)) => accumulated.push_str(&fragment),
                    StreamEvent::Delta(None) => {}
                    StreamEvent::Done => return Ok(accumulated),
                    StreamEvent::Ignored => {}
                }
            }
        }

        if !pending.trim().is_empty() {
            if let StreamEvent::Delta(Some(fragment)) = parse_stream_line(&pending)? {
                accumulated.push_str(&fragment);
            }
        }

        Ok(accumulated)
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    type Error = CompletionError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        ChatClient::complete(self, prompt).await
    }
}

/// Response of the models-listing endpoint
#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: Option<String>,
}

/// Fetch the model identifiers offered by the endpoint.
///
/// This listing is advisory (it only populates a selection list), so any
/// transport or HTTP failure is logged and collapses to an empty vector;
/// it never propagates.
pub async fn fetch_available_models(base_url: &str, api_key: &str) -> Vec<String> {
    let url = format!("{}/models", base_url.trim_end_matches('/'));

    let result = async {
        let response = reqwest::Client::new()
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| CompletionError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<ModelsResponse>()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse models: {}", e)))
    }
    .await;

    match result {
        Ok(parsed) => parsed.data.into_iter().filter_map(|m| m.id).collect(),
        Err(e) => {
            error!("Error fetching models from {}: {}", url, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_line(content: Option<&str>) -> String {
        match content {
            Some(text) => format!(
                r#"data: {{"choices":[{{"delta":{{"content":{}}}}}]}}"#,
                serde_json::to_string(text).unwrap()
            ),
            None => r#"data: {"choices":[{"delta":{}}]}"#.to_string(),
        }
    }

    #[test]
    fn test_client_holds_config() {
        let config = ApiConfig {
            model: "test-model".to_string(),
            ..ApiConfig::default()
        };
        let client = ChatClient::new(config);
        assert_eq!(client.config().model, "test-model");
        assert!(client.config().stream);
    }

    #[test]
    fn test_streaming_accumulation_skips_null_fragments() {
        // Chunk sequence ["Hel", "lo", null, " world"] must accumulate to
        // exactly "Hello world".
        let lines = [
            data_line(Some("Hel")),
            data_line(Some("lo")),
            data_line(None),
            data_line(Some(" world")),
            "data: [DONE]".to_string(),
        ];

        let mut accumulated = String::new();
        for line in &lines {
            match parse_stream_line(line).unwrap() {
                StreamEvent::Delta(Some(fragment)) => accumulated.push_str(&fragment),
                StreamEvent::Delta(None) => {}
                StreamEvent::Done => break,
                StreamEvent::Ignored => {}
            }
        }

        assert_eq!(accumulated, "Hello world");
    }

    #[test]
    fn test_stream_line_done() {
        assert!(matches!(
            parse_stream_line("data: [DONE]").unwrap(),
            StreamEvent::Done
        ));
    }

    #[test]
    fn test_stream_line_ignores_non_data() {
        assert!(matches!(
            parse_stream_line("").unwrap(),
            StreamEvent::Ignored
        ));
        assert!(matches!(
            parse_stream_line(": keep-alive").unwrap(),
            StreamEvent::Ignored
        ));
        assert!(matches!(
            parse_stream_line("event: message").unwrap(),
            StreamEvent::Ignored
        ));
    }

    #[test]
    fn test_stream_line_malformed_payload_errors() {
        let result = parse_stream_line("data: {not json");
        assert!(matches!(result, Err(CompletionError::InvalidResponse(_))));
    }

    #[test]
    fn test_stream_line_empty_choices_is_no_delta() {
        let event = parse_stream_line(r#"data: {"choices":[]}"#).unwrap();
        assert!(matches!(event, StreamEvent::Delta(None)));
    }

    #[tokio::test]
    async fn test_completion_error_surfaces() {
        // Unroutable endpoint: the error must come back to the caller.
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..ApiConfig::default()
        };
        let client = ChatClient::new(config);

        let result = client.complete("test").await;
        assert!(matches!(result, Err(CompletionError::Communication(_))));
    }

    #[tokio::test]
    async fn test_fetch_models_failure_is_empty() {
        let models = fetch_available_models("http://127.0.0.1:9", "key").await;
        assert!(models.is_empty());
    }
}
