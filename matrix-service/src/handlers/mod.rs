pub mod health;
pub mod process_matrix;

pub use health::{health_check, metrics_endpoint};
pub use process_matrix::{
    method_not_allowed, preflight, process_matrix, MAX_BODY_BYTES, PROCESS_MATRIX_PATH,
};
