//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Strip verbosity flag → Parse config → Init logging → Build server
//!     → Arm shutdown watcher → Serve
//!
//! Shutdown (shutdown.rs):
//!     Token fires → Stop accepting → Drain connections under deadline → Exit
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → Trigger the shutdown token
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging, then the server
//! - Startup failures are fatal before a listener is ever opened
//! - The drain deadline is independent of the already-fired token
//! - Shutdown failures are best-effort: reported, never fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownGuard};
pub use startup::{run, run_with_shutdown, RunError, SHUTDOWN_DEADLINE};
