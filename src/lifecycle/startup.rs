//! Startup and run orchestration.
//!
//! # Responsibilities
//! - Consume the verbosity flag before configuration parsing
//! - Build config, logging, and the server in dependency order
//! - Arm the shutdown watcher and run the blocking serve call
//! - Hold the run open until both serve and the watcher have finished
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, with no retry anywhere
//! - Cancellation decides *when* shutdown starts; a fresh 10s deadline
//!   decides *how long* the drain may take
//! - Drain failures go to stderr, not the structured logger, and never
//!   change the run's result

use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::{self, Config, ConfigError};
use crate::http::{ConstructError, Server, ServerHandle, ServeError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::logging;

/// How long a graceful drain may take before it is abandoned.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(10);

/// Fatal error surfaced to the process boundary.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to parse config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create server: {0}")]
    Construct(#[from] ConstructError),

    #[error("error listening and serving: {0}")]
    Serve(ServeError),
}

/// Run the service with signal-driven cancellation.
///
/// `args` is the raw process argument list (including the program name);
/// `env_lookup` injects the environment. Returns once the server has stopped
/// and the shutdown watcher has finished.
pub async fn run<E>(args: Vec<String>, env_lookup: E) -> Result<(), RunError>
where
    E: Fn(&str) -> Option<String>,
{
    let shutdown = Shutdown::new();
    signals::arm(&shutdown);
    run_with_shutdown(args, env_lookup, shutdown).await
}

/// Run the service with an externally supplied cancellation token.
///
/// This is the whole lifecycle: [`run`] only adds the signal wiring on top.
pub async fn run_with_shutdown<E>(
    args: Vec<String>,
    env_lookup: E,
    shutdown: Shutdown,
) -> Result<(), RunError>
where
    E: Fn(&str) -> Option<String>,
{
    // Released on every exit path, including the error returns below; this is
    // also what lets the signal listener task terminate.
    let _guard = shutdown.guard();

    let (verbose, args) = extract_verbose(args);
    let cfg = config::parse(&args, env_lookup)?;
    let cfg = Config { verbose, ..cfg };

    logging::init(cfg.verbose);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = %cfg.port,
        "Starting server"
    );

    let server = Server::new(&cfg)?;
    let handle = server.handle();

    // Only from this point on is cancellation acted upon: the token may have
    // fired earlier, but construction always completes first.
    let watcher = spawn_watcher(&shutdown, handle);

    tracing::info!(address = %cfg.listen_addr(), "Listening");
    let served = match server.serve().await {
        Ok(()) | Err(ServeError::Closed) => Ok(()),
        Err(err) => Err(RunError::Serve(err)),
    };

    // Serve has returned; release the token so the watcher wakes even when
    // nothing else fired it, then wait for it so draining and its log events
    // complete before the run ends.
    shutdown.trigger();
    let _ = watcher.await;

    served
}

/// Spawn the shutdown watcher: waits for the token, then performs the
/// bounded drain.
fn spawn_watcher(shutdown: &Shutdown, handle: ServerHandle) -> JoinHandle<()> {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        tracing::info!("Shutdown signal received");

        if let Err(err) = handle.shutdown(SHUTDOWN_DEADLINE).await {
            // Shutdown-path failures go to the raw error stream, not the
            // structured logger.
            eprintln!("error shutting down http server: {err}");
        }

        tracing::info!("Server stopped");
    })
}

/// Strip `--verbose`/`-v` from the raw arguments.
///
/// The flag belongs to the coordinator, not to the config source. The
/// relative order of all other arguments is preserved.
fn extract_verbose(args: Vec<String>) -> (bool, Vec<String>) {
    let mut verbose = false;
    let args = args
        .into_iter()
        .filter(|arg| {
            if arg == "--verbose" || arg == "-v" {
                verbose = true;
                false
            } else {
                true
            }
        })
        .collect();
    (verbose, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn extracts_long_verbose_flag() {
        let (verbose, rest) = extract_verbose(args(&["portico", "--verbose", "--port", "1"]));
        assert!(verbose);
        assert_eq!(rest, args(&["portico", "--port", "1"]));
    }

    #[test]
    fn extracts_short_verbose_flag_in_any_position() {
        let (verbose, rest) = extract_verbose(args(&["portico", "--port", "1", "-v"]));
        assert!(verbose);
        assert_eq!(rest, args(&["portico", "--port", "1"]));
    }

    #[test]
    fn preserves_order_of_other_arguments() {
        let (verbose, rest) =
            extract_verbose(args(&["portico", "a", "-v", "b", "--verbose", "c"]));
        assert!(verbose);
        assert_eq!(rest, args(&["portico", "a", "b", "c"]));
    }

    #[test]
    fn no_flag_leaves_arguments_untouched() {
        let original = args(&["portico", "--port", "9000"]);
        let (verbose, rest) = extract_verbose(original.clone());
        assert!(!verbose);
        assert_eq!(rest, original);
    }

    #[test]
    fn run_error_wraps_with_context() {
        let err = RunError::Serve(ServeError::Closed);
        assert!(err.to_string().starts_with("error listening and serving"));
    }
}
