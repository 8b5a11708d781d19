//! Metrics collection for matrix-service.
//!
//! HTTP request metrics come from the shared middleware; this module adds
//! upstream LLM call metrics and renders everything for `/metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

use super::llm::ProviderError;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it twice is a no-op.
pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one upstream call and its outcome.
pub fn record_llm_call(
    provider: &'static str,
    operation_kind: &'static str,
    result: &Result<String, ProviderError>,
    elapsed: Duration,
) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };

    counter!(
        "matrix_analysis_total",
        "provider" => provider,
        "operation_kind" => operation_kind,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("llm_request_duration_seconds", "provider" => provider, "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
