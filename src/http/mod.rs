//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Config
//!     → server.rs (build router + fixed timeout policy, no listener yet)
//!     → serve()   (bind, accept, handle; blocks until closed)
//!     → ServerHandle::shutdown(deadline)
//!                 (stop accepting, drain in-flight connections)
//! ```
//!
//! Request handling beyond the liveness surface is deliberately out of scope;
//! the interesting part is the serve/shutdown split.

pub mod server;

pub use server::{ConstructError, Server, ServerHandle, ServeError, ShutdownError};
