#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use matrix_service::config::{LlmConfig, MatrixConfig};
use matrix_service::services::ChatProvider;
use matrix_service::{build_router, AppState};
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config;
use service_core::middleware::CorsConfig;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const PROCESS_MATRIX: &str = "/api/process-matrix";

/// Config with credentials pointing at `endpoint` and a random port.
pub fn test_config(endpoint: &str) -> MatrixConfig {
    MatrixConfig {
        common: Config {
            port: 0,
            ..Default::default()
        },
        llm: LlmConfig {
            api_key: Some(Secret::new("sk-test".to_string())),
            api_endpoint: Some(endpoint.to_string()),
            timeout: Duration::from_secs(2),
            ..Default::default()
        },
        cors: CorsConfig::default(),
    }
}

pub fn app_with(config: MatrixConfig, provider: Arc<dyn ChatProvider>) -> Router {
    build_router(AppState::new(config, provider))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_json(app: Router, body: Value) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(PROCESS_MATRIX)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}
