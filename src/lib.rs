//! Function invocation router.
//!
//! Adapts HTTP, legacy event and CloudEvent functions to one HTTP
//! request/response lifecycle and instruments every invocation.

pub mod adapters;
pub mod config;
pub mod error;
pub mod execution;
pub mod function;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::FunctionConfig;
pub use error::InvocationError;
pub use function::{SignatureType, UserFunction};
pub use http::FunctionServer;
pub use lifecycle::Shutdown;
pub use routing::register_routes;
