use super::{ChatParams, ChatProvider, ProviderError};
use async_trait::async_trait;

/// Installed when credentials are missing so the service still starts;
/// every call reports which variables need to be set.
pub struct UnconfiguredProvider {
    missing: Vec<&'static str>,
}

impl UnconfiguredProvider {
    pub fn new(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }
}

#[async_trait]
impl ChatProvider for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn complete(&self, _prompt: &str, _params: &ChatParams) -> Result<String, ProviderError> {
        tracing::error!(missing = ?self.missing, "LLM API credentials are not configured");
        Err(ProviderError::NotConfigured(self.missing.clone()))
    }
}
