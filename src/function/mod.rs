//! User functions and their normalization.
//!
//! # Data Flow
//! ```text
//! host application
//!     → user.rs (UserFunction: one of four calling conventions)
//!     → signature.rs (declared SignatureType)
//!     → normalize.rs (match on both → NormalizedHandler)
//!     → routing layer binds the handler to the catch-all route
//! ```
//!
//! # Design Decisions
//! - Calling conventions form a closed enum, erased once at construction
//! - Dispatch is an exhaustive match; no per-request inspection
//! - Mismatched conventions surface at invocation, never at registration

pub mod normalize;
pub mod signature;
pub mod user;

pub use normalize::{normalize, NormalizedHandler};
pub use signature::{ParseSignatureError, SignatureType};
pub use user::{EventCallback, FunctionResult, UserFunction};
