//! Structured logging initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the process-wide tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set; otherwise the verbosity flag
/// selects `debug` or `info`. Infallible by contract: if a subscriber is
/// already installed (repeated runs inside one process, tests), this is a
/// no-op.
pub fn init(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
