//! OpenAI-compatible chat-completions client.
//!
//! Used against Moonshot/Kimi by default; any endpoint exposing
//! `POST {base}/chat/completions` with bearer auth works.

use super::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatParams, ChatProvider,
    ProviderError,
};
use crate::config::LlmCredentials;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// Longest upstream error body kept for callers and logs.
const MAX_ERROR_BODY_LEN: usize = 500;

pub struct ChatCompletionsProvider {
    credentials: LlmCredentials,
    client: Client,
    timeout: Duration,
}

impl ChatCompletionsProvider {
    pub fn new(credentials: LlmCredentials, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            credentials,
            client,
            timeout,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.credentials.api_endpoint)
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else if err.is_connect() {
            ProviderError::Unreachable(err.to_string())
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

#[async_trait]
impl ChatProvider for ChatCompletionsProvider {
    fn name(&self) -> &'static str {
        "chat_completions"
    }

    async fn complete(&self, prompt: &str, params: &ChatParams) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: &params.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            model = %params.model,
            prompt_len = prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .traced_post(&self.completions_url())
            .bearer_auth(self.credentials.api_key.expose_secret())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if let Some((idx, _)) = body.char_indices().nth(MAX_ERROR_BODY_LEN) {
                body.truncate(idx);
            }

            tracing::error!(
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or("-"),
                body = %body,
                "LLM API returned an error"
            );

            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = match response.json().await {
            Ok(completion) => completion,
            Err(e) if e.is_timeout() => return Err(ProviderError::Timeout(self.timeout)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse chat completion response");
                return Err(ProviderError::EmptyResponse);
            }
        };

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                finish_reason = ?completion.choices.first().and_then(|c| c.finish_reason.as_deref()),
                "Chat completion received"
            );
        }

        completion.into_content().ok_or_else(|| {
            tracing::error!("Chat completion contained no message content");
            ProviderError::EmptyResponse
        })
    }
}
