use serde_json::Value;

/// Upper bound on the sanitized operation, in characters.
pub const MAX_OPERATION_LEN: usize = 100;

/// Label reported when no specific operation was requested.
pub const GENERAL_ANALYSIS: &str = "general analysis";

/// Operations offered to callers as follow-ups.
pub const KNOWN_OPERATIONS: &[&str] = &[
    "inverse",
    "determinant",
    "transpose",
    "adjugate",
    "rank",
    "eigenvalues",
    "eigenvectors",
    "upper triangular",
    "lower triangular",
    "lu decomposition",
    "qr decomposition",
    "norm",
    "trace",
];

const SUGGESTION_COUNT: usize = 5;

const STRIPPED_CHARS: &[char] = &['<', '>', '"', '\'', '&'];

/// Trim, lowercase, drop markup-control characters and cap the length.
///
/// Anything that is not a string sanitizes to the empty string.
pub fn sanitize_operation(value: &Value) -> String {
    let Some(raw) = value.as_str() else {
        return String::new();
    };

    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .take(MAX_OPERATION_LEN)
        .collect()
}

/// What the caller asked the model to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    General,
    Specific(String),
}

impl Operation {
    pub fn from_json(value: &Value) -> Self {
        let sanitized = sanitize_operation(value);
        if sanitized.trim().is_empty() {
            Operation::General
        } else {
            Operation::Specific(sanitized)
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Operation::General => GENERAL_ANALYSIS,
            Operation::Specific(op) => op,
        }
    }

    /// Follow-up operations worth offering; only for general analysis.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Operation::General => KNOWN_OPERATIONS
                .iter()
                .take(SUGGESTION_COUNT)
                .map(|op| op.to_string())
                .collect(),
            Operation::Specific(_) => Vec::new(),
        }
    }
}
