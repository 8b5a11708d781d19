use crate::models::Matrix;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound payload. Fields stay untyped so that shape problems surface as
/// validation messages instead of deserializer errors.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessMatrixRequest {
    #[serde(default)]
    pub matrix: Value,
    #[serde(default)]
    pub operation: Value,
}

impl ProcessMatrixRequest {
    /// Lenient parse: a missing, malformed or non-object body yields an empty
    /// request, which then fails matrix validation.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessMatrixResponse {
    pub matrix: Matrix,
    pub operation: String,
    pub llm_response: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}
