//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve, graceful shutdown)
//!     → request.rs (x-request-id assigned and propagated)
//!     → TraceLayer span, body limit
//!     → routing layer (route table built from the user function)
//!     → response
//! ```

pub mod request;
pub mod server;

pub use request::{MakeExecutionId, X_REQUEST_ID};
pub use server::{FunctionServer, ServerError};
