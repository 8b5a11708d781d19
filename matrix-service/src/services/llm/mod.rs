//! LLM provider abstraction.
//!
//! The analyzer only talks to [`ChatProvider`], so the HTTP client, the
//! scripted mock used in tests and the placeholder installed when credentials
//! are missing are interchangeable.

pub mod chat_completions;
pub mod mock;
pub mod unconfigured;

pub use chat_completions::ChatCompletionsProvider;
pub use mock::MockChatProvider;
pub use unconfigured::UnconfiguredProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured, missing: {}", .0.join(", "))]
    NotConfigured(Vec<&'static str>),

    #[error("Upstream call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("Upstream returned no usable content")]
    EmptyResponse,

    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Status { .. } => "http_error",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::Unreachable(_) => "unreachable",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// Generation parameters sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Trait for single-turn chat completion backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Send `prompt` as a single user message and return the reply text.
    async fn complete(&self, prompt: &str, params: &ChatParams) -> Result<String, ProviderError>;
}

// Chat-completions wire types.

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any.
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_serializes_single_user_message() {
        let request = ChatCompletionRequest {
            model: "moonshot-v1-8k",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 1500,
            temperature: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "moonshot-v1-8k",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 1500
            })
        );
    }

    #[test]
    fn test_content_from_first_choice() {
        let response = parse(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "det = -2"}, "finish_reason": "stop"},
                {"message": {"content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4}
        }));
        assert_eq!(response.into_content().as_deref(), Some("det = -2"));
    }

    #[test]
    fn test_missing_content_is_none() {
        for value in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": {"content": null}}]}),
            json!({"choices": [{"message": {"content": ""}}]}),
        ] {
            assert!(parse(value).into_content().is_none());
        }
    }
}
