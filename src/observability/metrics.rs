//! Metrics collection and exposition.
//!
//! # Metrics
//! - `function_executions_total` (counter): timed executions by status code
//! - `function_execution_duration_seconds` (histogram): execution latency
//!
//! Only timed executions are recorded, so requests the timing policy
//! suppresses never show up here either.

use std::net::SocketAddr;

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished execution.
pub fn record_execution(elapsed_ms: u64, status: StatusCode) {
    metrics::counter!("function_executions_total", "status" => status.as_u16().to_string())
        .increment(1);
    metrics::histogram!("function_execution_duration_seconds").record(elapsed_ms as f64 / 1000.0);
}
