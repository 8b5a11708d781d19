pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::{CorsConfig, cors_middleware};
pub use self::metrics::metrics_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
