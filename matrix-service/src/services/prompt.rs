//! Prompt templates sent to the model.

use crate::models::{Matrix, Operation};

/// Build the user message for the requested operation.
pub fn compose_prompt(matrix: &Matrix, operation: &Operation) -> String {
    match operation {
        Operation::Specific(op) => operation_prompt(&matrix.to_json(), op),
        Operation::General => general_prompt(&matrix.to_json()),
    }
}

fn operation_prompt(matrix_json: &str, operation: &str) -> String {
    format!(
        "As a linear algebra expert, solve this matrix operation step by step:

MATRIX:
{matrix_json}

REQUESTED OPERATION: {operation}

Please provide:
1. Whether the operation is possible for this matrix
2. A detailed step-by-step procedure
3. The final result (matrix or numeric value)
4. A mathematical interpretation of the result

If the operation is not possible, explain clearly why and suggest alternatives.

Format the answer clearly and educationally."
    )
}

fn general_prompt(matrix_json: &str) -> String {
    format!(
        "Analyze this matrix and describe its main mathematical properties:

MATRIX:
{matrix_json}

Include:
- Dimensions and matrix type
- Determinant (if square)
- Rank
- Whether it is symmetric, antisymmetric, diagonal, etc.
- Special properties
- Suggestions for useful operations

Present the information in an organized, educational way."
    )
}
