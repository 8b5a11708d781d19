use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::middleware::CorsConfig;
use std::env;
use std::time::Duration;

pub const API_KEY_VAR: &str = "KIMI_API_KEY";
pub const API_ENDPOINT_VAR: &str = "API_ENDPOINT";

const DEFAULT_MODEL: &str = "moonshot-v1-8k";
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub common: core_config::Config,
    pub llm: LlmConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer token for the chat-completions API.
    pub api_key: Option<Secret<String>>,
    /// Base URL; `/chat/completions` is appended.
    pub api_endpoint: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Wall-clock bound on a single upstream call.
    pub timeout: Duration,
}

/// Credentials required to reach the LLM API.
#[derive(Debug, Clone)]
pub struct LlmCredentials {
    pub api_key: Secret<String>,
    pub api_endpoint: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Both credentials, or the names of the variables that are missing.
    pub fn credentials(&self) -> Result<LlmCredentials, Vec<&'static str>> {
        match (&self.api_key, &self.api_endpoint) {
            (Some(api_key), Some(api_endpoint)) => Ok(LlmCredentials {
                api_key: api_key.clone(),
                api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            }),
            (key, endpoint) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push(API_KEY_VAR);
                }
                if endpoint.is_none() {
                    missing.push(API_ENDPOINT_VAR);
                }
                Err(missing)
            }
        }
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_key: lookup(API_KEY_VAR).map(Secret::new),
            api_endpoint: lookup(API_ENDPOINT_VAR),
            model: lookup("LLM_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_or("LLM_MAX_TOKENS", lookup, defaults.max_tokens),
            temperature: parse_or("LLM_TEMPERATURE", lookup, defaults.temperature),
            timeout: Duration::from_secs(parse_or(
                "LLM_TIMEOUT_SECS",
                lookup,
                DEFAULT_TIMEOUT_SECS,
            )),
        }
    }
}

impl MatrixConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Ok(Self::from_lookup(common, |key| env::var(key).ok()))
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(
        common: core_config::Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let llm = LlmConfig::from_lookup(&lookup);

        let mut cors = CorsConfig::default();
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        tracing::debug!(
            has_api_key = llm.api_key.is_some(),
            api_key_len = llm.api_key.as_ref().map(|k| k.expose_secret().len()).unwrap_or(0),
            api_endpoint = ?llm.api_endpoint,
            model = %llm.model,
            "Loaded LLM configuration"
        );

        Self { common, llm, cors }
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> MatrixConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MatrixConfig::from_lookup(core_config::Config::default(), move |key| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]);

        assert_eq!(config.llm.model, "moonshot-v1-8k");
        assert_eq!(config.llm.max_tokens, 1500);
        assert_eq!(config.llm.timeout, Duration::from_secs(30));
        assert!((config.llm.temperature - 0.1).abs() < f32::EPSILON);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_missing_credentials_are_named() {
        let missing = config_from(&[]).llm.credentials().unwrap_err();
        assert_eq!(missing, vec![API_KEY_VAR, API_ENDPOINT_VAR]);

        let missing = config_from(&[(API_KEY_VAR, "sk-test")])
            .llm
            .credentials()
            .unwrap_err();
        assert_eq!(missing, vec![API_ENDPOINT_VAR]);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let missing = config_from(&[(API_KEY_VAR, "   "), (API_ENDPOINT_VAR, "https://api.test/v1")])
            .llm
            .credentials()
            .unwrap_err();
        assert_eq!(missing, vec![API_KEY_VAR]);
    }

    #[test]
    fn test_credentials_trim_trailing_slash() {
        let creds = config_from(&[
            (API_KEY_VAR, "sk-test"),
            (API_ENDPOINT_VAR, "https://api.test/v1/"),
        ])
        .llm
        .credentials()
        .unwrap();

        assert_eq!(creds.api_endpoint, "https://api.test/v1");
        assert_eq!(creds.api_key.expose_secret(), "sk-test");
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = config_from(&[
            ("LLM_MODEL", "kimi-latest"),
            ("LLM_MAX_TOKENS", "not-a-number"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test,"),
        ]);

        assert_eq!(config.llm.model, "kimi-latest");
        assert_eq!(config.llm.max_tokens, 1500);
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }
}
