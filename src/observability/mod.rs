//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!
//! Consumers:
//!     → stdout via tracing-subscriber fmt layer
//!     → shutdown-path failures go to stderr directly, bypassing tracing
//! ```
//!
//! # Design Decisions
//! - Structured logging with key/value fields on every event
//! - Filter honors RUST_LOG when set; otherwise derived from the verbosity flag
//! - Initialization is idempotent so repeated runs (tests) are a no-op

pub mod logging;
