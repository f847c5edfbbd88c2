//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → FunctionConfig (validated, immutable)
//!     → FunctionServer builds the route table from it once
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table never changes while serving
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{FunctionConfig, ListenerConfig, LogFormat, ObservabilityConfig, TimingConfig};
pub use validation::{validate_config, ValidationError};
