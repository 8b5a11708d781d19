pub mod analyzer;
pub mod llm;
pub mod metrics;
pub mod prompt;

pub use analyzer::MatrixAnalyzer;
pub use llm::{ChatParams, ChatProvider, ProviderError};
pub use self::metrics::{get_metrics, init_metrics};
pub use prompt::compose_prompt;
