pub mod matrix;
pub mod operation;

pub use matrix::{Matrix, MatrixError};
pub use operation::{sanitize_operation, Operation, GENERAL_ANALYSIS, KNOWN_OPERATIONS};
