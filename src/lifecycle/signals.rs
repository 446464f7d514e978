//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT and SIGTERM
//! - Translate either signal into a [`Shutdown`] trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The listener task also watches the token itself, so it terminates when
//!   the coordinator releases the token on an early exit path

use tokio::signal;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Arm signal-driven cancellation for the given token.
///
/// Spawns one task that triggers the token when SIGINT or SIGTERM arrives.
/// The task exits on its own once the token fires, whatever fired it.
pub fn arm(shutdown: &Shutdown) -> JoinHandle<()> {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => shutdown.trigger(),
            _ = shutdown.cancelled() => {}
        }
    })
}

/// Wait for SIGINT (ctrl-c) or SIGTERM.
async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn listener_exits_when_token_released() {
        let shutdown = Shutdown::new();
        let listener = arm(&shutdown);

        // No signal is delivered; releasing the token must still end the task.
        shutdown.trigger();
        timeout(Duration::from_secs(1), listener)
            .await
            .expect("listener should exit on token release")
            .unwrap();
    }
}
