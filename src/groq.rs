use std::env;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{error_message, ChatError};
use crate::models::ChatRequest;
use crate::sse::{SseLineParser, StreamFrame};
use crate::transcript::Turn;

/// Groq's OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Model requested when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Transport configuration for the completion client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the environment on top of the built-in defaults.
    ///
    /// A missing `GROQ_API_KEY` is not an error here: the empty key is sent
    /// and the endpoint's rejection surfaces through the normal failure
    /// path, which keeps startup unconditional.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = env::var("GROQ_API_KEY") {
            config.api_key = key;
        }
        if let Ok(model) = env::var("SONGLAP_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(endpoint) = env::var("SONGLAP_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Streaming chat-completions client. One exchange per [`complete`] call;
/// the caller owns the transcript and decides what to commit.
///
/// [`complete`]: ChatClient::complete
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one streamed exchange and return the final accumulated text.
    ///
    /// `turns` is sent verbatim as the message history. `on_delta` is
    /// invoked once per decoded frame, in arrival order, with the full
    /// accumulation so far, never the bare fragment; successive calls see
    /// text that only ever extends. The stream ends at the `[DONE]`
    /// sentinel, or at end of body when the sentinel never arrives.
    pub async fn complete<F>(&self, turns: &[Turn], mut on_delta: F) -> Result<String, ChatError>
    where
        F: FnMut(&str),
    {
        let body = ChatRequest {
            model: &self.config.model,
            messages: turns,
            stream: true,
        };
        debug!(
            model = %self.config.model,
            turns = turns.len(),
            "opening completion stream"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            warn!(%status, %message, "completion request rejected");
            return Err(ChatError::Status { status, message });
        }

        let mut stream = response.bytes_stream();
        let mut parser = SseLineParser::new();
        let mut accumulated = String::new();

        'read: while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for frame in parser.feed(&chunk) {
                match frame {
                    StreamFrame::Delta(fragment) => {
                        accumulated.push_str(&fragment);
                        on_delta(&accumulated);
                    }
                    StreamFrame::Done => break 'read,
                }
            }
        }

        if !parser.is_buffer_empty() {
            debug!("discarding unterminated trailing line");
        }
        debug!(bytes = accumulated.len(), "completion stream finished");
        Ok(accumulated)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
    use std::time::Duration;

    #[test]
    fn default_config_targets_groq() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, "");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn builder_overrides_stick() {
        let config = ClientConfig::default()
            .with_api_key("gsk_test")
            .with_model("llama-3.1-8b-instant")
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions")
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.api_key, "gsk_test");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.endpoint, "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
