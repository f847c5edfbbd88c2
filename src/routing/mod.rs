//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → /favicon.ico, /robots.txt → 404, empty body (HTTP signature only)
//!     → catch-all (/ and /{*path})
//!         HTTP:              any method, completion tracked
//!         event, cloudevent: POST only
//!     → Executor → NormalizedHandler
//! ```
//!
//! # Design Decisions
//! - Route table is built once per application and immutable while serving
//! - Method filtering is left to axum (405 for unmatched methods)

pub mod router;

pub use router::{register_routes, SUPPRESSED_PATHS};
