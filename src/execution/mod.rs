//! Execution instrumentation subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → completion.rs (HTTP only: attach finished-flag guard)
//!     → executor.rs (ask timing.rs whether to time this request)
//!         → log.rs: execution started
//!         → NormalizedHandler
//!         → log.rs: execution finished (elapsed ms, status), success only
//!     → response (guard rides in the body until it is dropped)
//! ```
//!
//! # Design Decisions
//! - Timing decision is a pluggable policy; the platform-host rule is one provider
//! - Completion is a drop guard, so every exit path marks the execution finished
//! - No timeouts or cancellation at this layer

pub mod completion;
pub mod executor;
pub mod log;
pub mod timing;

pub use completion::{track_completion, ExecutionState};
pub use executor::{Executor, Instrumentation};
pub use log::{ExecutionLog, TracingExecutionLog};
pub use timing::{HostSuppression, StaticTiming, TimingPolicy, MANAGED_PLATFORM_HOST};
