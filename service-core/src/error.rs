use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// User-facing error payload rendered as the JSON error envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn technical_details(mut self, technical: impl Into<String>) -> Self {
        self.technical_details = Some(technical.into());
        self
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.error, details),
            None => f.write_str(&self.error),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(ErrorBody),

    #[error("Method not allowed")]
    MethodNotAllowed { allowed: Vec<String> },

    #[error("Configuration error: {0}")]
    ConfigError(ErrorBody),

    #[error("Request timeout: {0}")]
    RequestTimeout(ErrorBody),

    #[error("Bad Gateway: {0}")]
    BadGateway(ErrorBody),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(ErrorBody),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(ErrorBody::new("Configuration error").details(err.to_string()))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct MethodNotAllowedResponse {
            error: &'static str,
            allowed_methods: Vec<String>,
        }

        let status = self.status_code();

        match self {
            AppError::MethodNotAllowed { allowed } => (
                status,
                Json(MethodNotAllowedResponse {
                    error: "Method not allowed",
                    allowed_methods: allowed,
                }),
            )
                .into_response(),
            AppError::InternalError(err) => {
                // The cause stays in the logs; callers only see a stable message.
                tracing::error!(error = ?err, "Unhandled internal error");
                (
                    status,
                    Json(
                        ErrorBody::new("Internal server error")
                            .details("Unexpected error")
                            .suggestion("If the problem persists, contact technical support"),
                    ),
                )
                    .into_response()
            }
            AppError::BadRequest(body)
            | AppError::ConfigError(body)
            | AppError::RequestTimeout(body)
            | AppError::BadGateway(body)
            | AppError::ServiceUnavailable(body) => (status, Json(body)).into_response(),
        }
    }
}
