//! Matrix analysis pipeline: prompt, bounded upstream call, metrics.

use super::llm::{ChatParams, ChatProvider, ProviderError};
use super::metrics::record_llm_call;
use super::prompt::compose_prompt;
use crate::config::LlmConfig;
use crate::models::{Matrix, Operation};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct MatrixAnalyzer {
    provider: Arc<dyn ChatProvider>,
    params: ChatParams,
    timeout: Duration,
}

impl MatrixAnalyzer {
    pub fn new(provider: Arc<dyn ChatProvider>, params: ChatParams, timeout: Duration) -> Self {
        Self {
            provider,
            params,
            timeout,
        }
    }

    pub fn from_config(provider: Arc<dyn ChatProvider>, config: &LlmConfig) -> Self {
        let params = ChatParams {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
        };
        Self::new(provider, params, config.timeout)
    }

    /// Ask the model about `matrix`. The upstream call is dropped once the
    /// timeout elapses.
    #[tracing::instrument(
        skip_all,
        fields(
            provider = self.provider.name(),
            operation = %operation.label(),
            rows = matrix.rows(),
            cols = matrix.cols()
        )
    )]
    pub async fn analyze(
        &self,
        matrix: &Matrix,
        operation: &Operation,
    ) -> Result<String, ProviderError> {
        let prompt = compose_prompt(matrix, operation);
        let started = Instant::now();

        let result = match tokio::time::timeout(
            self.timeout,
            self.provider.complete(&prompt, &self.params),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "LLM call timed out");
                Err(ProviderError::Timeout(self.timeout))
            }
        };

        let operation_kind = match operation {
            Operation::General => "general",
            Operation::Specific(_) => "specific",
        };
        record_llm_call(self.provider.name(), operation_kind, &result, started.elapsed());

        result
    }
}
