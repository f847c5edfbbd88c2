//! Execution log sink.

use axum::http::StatusCode;

use crate::observability::metrics;

/// Receives the two execution timing events.
///
/// Called synchronously on the request path; implementations must not block.
pub trait ExecutionLog: Send + Sync {
    fn execution_started(&self);
    fn execution_finished(&self, elapsed_ms: u64, status: StatusCode);
}

/// Default sink: structured `tracing` events plus execution metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExecutionLog;

impl ExecutionLog for TracingExecutionLog {
    fn execution_started(&self) {
        tracing::info!("Execution started");
    }

    fn execution_finished(&self, elapsed_ms: u64, status: StatusCode) {
        tracing::info!(
            execution_time_ms = elapsed_ms,
            status_code = status.as_u16(),
            "Execution finished"
        );
        metrics::record_execution(elapsed_ms, status);
    }
}
