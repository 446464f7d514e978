//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process arguments (verbosity flag already consumed by the coordinator)
//!     + environment lookup
//!     → loader.rs (parse arguments, resolve PORT fallback)
//!     → validation.rs (semantic checks, all errors collected)
//!     → Config (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; there is no reload path
//! - The environment is an injected lookup function, never read globally
//! - Validation separates syntactic (clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{parse, ConfigError};
pub use schema::{Config, TimeoutConfig};
pub use validation::ValidationError;
