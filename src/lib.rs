//! Lifecycle-coordinated HTTP service.
//!
//! # Architecture Overview
//!
//! ```text
//! process args + env ──▶ config (parse, validate)
//!                              │
//!                              ▼
//!                        observability (tracing init)
//!                              │
//!                              ▼
//!                        http::Server (axum router, fixed timeouts)
//!                              │
//!            ┌─────────────────┴──────────────────┐
//!            ▼                                    ▼
//!      serve() on the                      shutdown watcher task
//!      calling task                        (waits on the token,
//!      (blocks until closed)                drains with a 10s deadline)
//!            ▲                                    ▲
//!            └────────── lifecycle::Shutdown ─────┘
//!                        (SIGINT / SIGTERM)
//! ```
//!
//! Startup is strict: configuration or construction failures abort the run
//! before a listener is ever opened. Shutdown is best-effort: a failed drain
//! is reported on stderr and the run still succeeds.

// Core subsystems
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::Config;
pub use http::Server;
pub use lifecycle::{run, run_with_shutdown, RunError, Shutdown};
