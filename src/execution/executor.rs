//! Instrumented execution of the normalized handler.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::Request, http::header, response::Response};

use crate::error::InvocationError;
use crate::execution::log::ExecutionLog;
use crate::execution::timing::TimingPolicy;
use crate::function::NormalizedHandler;

/// Timing policy and log sink applied around every invocation.
#[derive(Clone)]
pub struct Instrumentation {
    pub timing: Arc<dyn TimingPolicy>,
    pub log: Arc<dyn ExecutionLog>,
}

impl Instrumentation {
    pub fn new(timing: Arc<dyn TimingPolicy>, log: Arc<dyn ExecutionLog>) -> Self {
        Self { timing, log }
    }
}

impl fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumentation")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

/// Runs the normalized handler, bracketing it with timing logs when enabled.
#[derive(Debug, Clone)]
pub struct Executor {
    handler: NormalizedHandler,
    instrumentation: Instrumentation,
}

impl Executor {
    pub fn new(handler: NormalizedHandler, instrumentation: Instrumentation) -> Self {
        Self {
            handler,
            instrumentation,
        }
    }

    /// Invoke the handler for one request.
    ///
    /// Errors are returned untouched. The finished event is only logged when
    /// the handler succeeds; a failed invocation has a started event and no
    /// finished event.
    pub async fn execute(&self, request: Request) -> Result<Response, InvocationError> {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| request.uri().authority().map(|a| a.as_str()));

        if !self.instrumentation.timing.timing_enabled(host) {
            return self.handler.call(request).await;
        }

        let log = &self.instrumentation.log;
        log.execution_started();
        let start = Instant::now();

        let response = self.handler.call(request).await?;

        // as_millis truncates sub-millisecond time.
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log.execution_finished(elapsed_ms, response.status());
        Ok(response)
    }
}
