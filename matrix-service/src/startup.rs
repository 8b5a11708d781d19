//! Application startup and lifecycle management.

use crate::config::MatrixConfig;
use crate::handlers::{
    health_check, method_not_allowed, metrics_endpoint, preflight, process_matrix,
    MAX_BODY_BYTES, PROCESS_MATRIX_PATH,
};
use crate::services::llm::{ChatCompletionsProvider, UnconfiguredProvider};
use crate::services::{ChatProvider, MatrixAnalyzer};
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_middleware, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: MatrixConfig,
    pub analyzer: MatrixAnalyzer,
}

impl AppState {
    pub fn new(config: MatrixConfig, provider: Arc<dyn ChatProvider>) -> Self {
        let analyzer = MatrixAnalyzer::from_config(provider, &config.llm);
        Self { config, analyzer }
    }
}

/// Pick the real provider when credentials are present, otherwise a
/// placeholder that fails each request with a configuration error.
pub fn build_provider(config: &MatrixConfig) -> Result<Arc<dyn ChatProvider>, AppError> {
    match config.llm.credentials() {
        Ok(credentials) => {
            tracing::info!(
                endpoint = %credentials.api_endpoint,
                model = %config.llm.model,
                timeout_secs = config.llm.timeout.as_secs(),
                "LLM chat-completions provider initialized"
            );
            let provider = ChatCompletionsProvider::new(credentials, config.llm.timeout)
                .map_err(|e| {
                    tracing::error!("Failed to build HTTP client: {}", e);
                    AppError::InternalError(e.into())
                })?;
            Ok(Arc::new(provider))
        }
        Err(missing) => {
            tracing::warn!(
                missing = ?missing,
                "LLM credentials not configured - matrix requests will fail until they are set"
            );
            Ok(Arc::new(UnconfiguredProvider::new(missing)))
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = Arc::new(state.config.cors.clone());

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route(
            PROCESS_MATRIX_PATH,
            post(process_matrix)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn_with_state(cors, cors_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the trace span sees the generated request id.
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: MatrixConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build with an explicit provider (port 0 binds a random port).
    pub async fn build_with_provider(
        config: MatrixConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(config, provider));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("matrix-service listening on port {}", self.port);
        axum::serve(self.listener, self.router).await
    }
}
