use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, StatusCode},
    Extension, Json,
};
use chrono::{SecondsFormat, Utc};
use service_core::error::{AppError, ErrorBody};
use service_core::middleware::RequestId;

use crate::dtos::{ProcessMatrixRequest, ProcessMatrixResponse};
use crate::models::{Matrix, Operation};
use crate::startup::AppState;

pub const PROCESS_MATRIX_PATH: &str = "/api/process-matrix";

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Validate the matrix, ask the model about it and relay the answer.
#[tracing::instrument(skip_all, fields(request_id = %request_id))]
pub async fn process_matrix(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ProcessMatrixResponse>, AppError> {
    let body = body.map_err(reject_body)?;

    tracing::debug!(
        origin = ?headers.get(header::ORIGIN),
        header_names = ?headers.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
        body_len = body.len(),
        "Received matrix request"
    );

    let request = ProcessMatrixRequest::from_body(&body);

    let matrix = Matrix::from_json(&request.matrix).map_err(|e| {
        tracing::info!(reason = %e, "Rejected invalid matrix");
        AppError::from(e)
    })?;
    let operation = Operation::from_json(&request.operation);

    let llm_response = state.analyzer.analyze(&matrix, &operation).await?;

    tracing::info!(
        operation = %operation.label(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        response_len = llm_response.len(),
        "Matrix analysis completed"
    );

    Ok(Json(ProcessMatrixResponse {
        operation: operation.label().to_string(),
        suggestions: operation.suggestions(),
        matrix,
        llm_response,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

fn reject_body(rejection: BytesRejection) -> AppError {
    tracing::info!(reason = %rejection.body_text(), "Rejected unreadable request body");
    let envelope = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorBody::new("Request body too large")
            .details(format!("The body must not exceed {} bytes", MAX_BODY_BYTES))
            .suggestion("Send a smaller matrix")
    } else {
        ErrorBody::new("Invalid request body").details(rejection.body_text())
    };
    AppError::BadRequest(envelope)
}

/// CORS preflight; the headers come from the CORS middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed(method: Method) -> AppError {
    tracing::info!(%method, "Method not allowed");
    AppError::MethodNotAllowed {
        allowed: vec![Method::POST.to_string()],
    }
}
