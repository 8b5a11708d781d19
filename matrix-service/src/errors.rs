//! Mapping of validation and upstream failures onto the HTTP error envelope.

use crate::models::MatrixError;
use crate::services::ProviderError;
use service_core::error::{AppError, ErrorBody};
use std::time::Duration;

/// User-facing category of a non-success upstream status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    Unauthorized,
    RateLimited,
    Unavailable,
    Other,
}

impl UpstreamFailure {
    pub fn classify(status: u16) -> Self {
        match status {
            401 => UpstreamFailure::Unauthorized,
            429 => UpstreamFailure::RateLimited,
            s if s >= 500 => UpstreamFailure::Unavailable,
            _ => UpstreamFailure::Other,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            UpstreamFailure::Unauthorized => "Invalid or expired API key",
            UpstreamFailure::RateLimited => "Request limit exceeded",
            UpstreamFailure::Unavailable => "The AI service is temporarily unavailable",
            UpstreamFailure::Other => "AI service error",
        }
    }

    pub fn suggestion(self) -> &'static str {
        match self {
            UpstreamFailure::Unauthorized => "Contact the administrator to verify the configuration",
            UpstreamFailure::RateLimited => "Wait a moment before trying again",
            UpstreamFailure::Unavailable => "Try again in a few minutes",
            UpstreamFailure::Other => "Try again in a few moments",
        }
    }
}

impl From<MatrixError> for AppError {
    fn from(err: MatrixError) -> Self {
        AppError::BadRequest(ErrorBody::new("Invalid matrix").details(err.to_string()))
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(missing) => AppError::ConfigError(
                ErrorBody::new("API configuration not found")
                    .details(format!("Missing variables: {}", missing.join(", ")))
                    .suggestion("Contact the administrator to configure the environment variables"),
            ),
            ProviderError::Timeout(bound) => AppError::RequestTimeout(
                ErrorBody::new("The operation took too long")
                    .details(format!("Timed out after {}", describe_duration(bound)))
                    .suggestion("Try a smaller matrix or a simpler operation"),
            ),
            ProviderError::Status { status, body } => {
                let failure = UpstreamFailure::classify(status);
                let mut envelope = ErrorBody::new(failure.message())
                    .details(format!("Status code: {}", status))
                    .suggestion(failure.suggestion());
                if !body.is_empty() {
                    envelope = envelope.technical_details(body);
                }
                AppError::BadGateway(envelope)
            }
            ProviderError::EmptyResponse => AppError::BadGateway(
                ErrorBody::new("The AI service did not return a valid response")
                    .details("The model response was empty or malformed")
                    .suggestion("Try rephrasing the request or using a simpler operation"),
            ),
            ProviderError::Unreachable(_) => AppError::ServiceUnavailable(
                ErrorBody::new("AI service unavailable")
                    .details("Could not connect to the external service")
                    .suggestion("Try again later"),
            ),
            ProviderError::NetworkError(msg) => {
                AppError::InternalError(anyhow::anyhow!("LLM request failed: {}", msg))
            }
        }
    }
}

fn describe_duration(bound: Duration) -> String {
    if bound.subsec_millis() == 0 {
        format!("{} seconds", bound.as_secs())
    } else {
        format!("{} ms", bound.as_millis())
    }
}
