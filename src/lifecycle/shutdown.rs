//! Shutdown coordination.

use std::sync::Arc;

use tokio::sync::watch;

/// One-shot cancellation token signalling "begin shutdown".
///
/// Triggered at most effectively once (later triggers are no-ops) and
/// observable by any number of waiters. Observers that subscribe after the
/// trigger still see it, which is what makes the serve/watcher race safe.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new, untriggered token.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Mark the token. Idempotent.
    pub fn trigger(&self) {
        // send_replace stores the value even when no receiver currently exists.
        self.tx.send_replace(true);
    }

    /// Wait until the token has been triggered.
    ///
    /// Resolves immediately when the token already fired.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Non-blocking probe.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Scoped release: the returned guard triggers the token when dropped,
    /// so every exit path of the owning scope releases waiters.
    pub fn guard(&self) -> ShutdownGuard {
        ShutdownGuard {
            shutdown: self.clone(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that triggers its [`Shutdown`] token on drop.
#[derive(Debug)]
pub struct ShutdownGuard {
    shutdown: Shutdown,
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
