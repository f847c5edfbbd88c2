//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Executor / adapters / server produce:
//!     → logging.rs (tracing subscriber: pretty or JSON, env filter)
//!     → metrics.rs (execution counters and latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID (x-request-id) set on every request and echoed back
//! - Metrics are cheap no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
