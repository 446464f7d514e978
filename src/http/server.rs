//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the Axum router and middleware stack from the config
//! - Bind and serve, blocking until intentionally closed or failed
//! - Provide a bounded graceful-shutdown operation on a clonable handle
//!
//! # Design Decisions
//! - Construction never opens a listener; binding happens inside `serve`
//! - `serve` returns the distinguished [`ServeError::Closed`] as soon as
//!   shutdown begins; draining continues on a background task
//! - `shutdown` owns the drain deadline, so an already-cancelled caller
//!   context cannot cut the drain short

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::lifecycle::Shutdown;

/// Error type for server construction.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// The configured port does not form a bindable socket address.
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },
}

/// Error type for the blocking serve operation.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The server was closed intentionally via shutdown. This is the expected
    /// outcome of a graceful stop and is treated as success by the caller.
    #[error("server closed")]
    Closed,

    /// Binding the listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The accept/serve loop failed.
    #[error("i/o error while serving: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    /// Whether this is the distinguished intentional-close condition.
    pub fn is_closed(&self) -> bool {
        matches!(self, ServeError::Closed)
    }
}

/// Error type for the bounded shutdown operation.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// In-flight connections did not drain before the deadline.
    #[error("graceful shutdown deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The serving task went away without completing its drain.
    #[error("server task exited without completing its drain")]
    Aborted,
}

/// HTTP server, built but not yet listening.
///
/// The listener is opened by [`Server::serve`]; construction only parses the
/// address and assembles the router, so constructor failures can never leak a
/// bound socket.
pub struct Server {
    router: Router,
    addr: SocketAddr,
    shutdown: Shutdown,
    drained_tx: watch::Sender<bool>,
    drained_rx: watch::Receiver<bool>,
    addr_tx: watch::Sender<Option<SocketAddr>>,
    addr_rx: watch::Receiver<Option<SocketAddr>>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("addr", &self.addr)
            .field("shutdown", &self.shutdown)
            .field("drained_tx", &self.drained_tx)
            .field("drained_rx", &self.drained_rx)
            .field("addr_tx", &self.addr_tx)
            .field("addr_rx", &self.addr_rx)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Create a new server from the given configuration.
    pub fn new(config: &Config) -> Result<Self, ConstructError> {
        let addr_str = config.listen_addr();
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|source| ConstructError::InvalidAddress {
                addr: addr_str,
                source,
            })?;

        let (drained_tx, drained_rx) = watch::channel(false);
        let (addr_tx, addr_rx) = watch::channel(None);

        Ok(Self {
            router: build_router(config),
            addr,
            shutdown: Shutdown::new(),
            drained_tx,
            drained_rx,
            addr_tx,
            addr_rx,
        })
    }

    /// Clonable handle for shutting the server down and observing it.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.shutdown.clone(),
            drained: self.drained_rx.clone(),
            addr: self.addr_rx.clone(),
        }
    }

    /// Bind the listener and serve until closed.
    ///
    /// Blocks the calling task. Returns [`ServeError::Closed`] promptly once
    /// shutdown is initiated; in-flight connections keep draining on a
    /// background task, and the drain's completion is what
    /// [`ServerHandle::shutdown`] waits for.
    pub async fn serve(self) -> Result<(), ServeError> {
        let listener = match TcpListener::bind(self.addr).await {
            Ok(listener) => listener,
            Err(source) => {
                // Nothing was started, so there is nothing to drain.
                self.drained_tx.send_replace(true);
                return Err(ServeError::Bind {
                    addr: self.addr,
                    source,
                });
            }
        };

        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(err) => {
                self.drained_tx.send_replace(true);
                return Err(ServeError::Io(err));
            }
        };
        self.addr_tx.send_replace(Some(local_addr));

        tracing::info!(address = %local_addr, "HTTP server starting");

        let token = self.shutdown.clone();
        let drained_tx = self.drained_tx;
        let app = self.router.into_make_service();

        let mut serving = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            drained_tx.send_replace(true);
            result
        });

        tokio::select! {
            joined = &mut serving => match joined {
                // The serve loop only finishes on its own once the token
                // fired and the drain completed.
                Ok(Ok(())) => Err(ServeError::Closed),
                Ok(Err(err)) => Err(ServeError::Io(err)),
                Err(err) => Err(ServeError::Io(std::io::Error::other(err))),
            },
            _ = self.shutdown.cancelled() => Err(ServeError::Closed),
        }
    }
}

/// Clonable observer/control handle for a [`Server`].
#[derive(Debug, Clone)]
pub struct ServerHandle {
    shutdown: Shutdown,
    drained: watch::Receiver<bool>,
    addr: watch::Receiver<Option<SocketAddr>>,
}

impl ServerHandle {
    /// Initiate graceful shutdown and wait for the drain, bounded by
    /// `deadline`.
    ///
    /// Idempotent trigger; the deadline only governs how long the drain may
    /// take, independent of whatever cancelled the caller.
    pub async fn shutdown(&self, deadline: Duration) -> Result<(), ShutdownError> {
        self.shutdown.trigger();

        let mut drained = self.drained.clone();
        let result = match tokio::time::timeout(deadline, drained.wait_for(|done| *done)).await {
            Err(_elapsed) => Err(ShutdownError::DeadlineExceeded(deadline)),
            Ok(Err(_closed)) => Err(ShutdownError::Aborted),
            Ok(Ok(_)) => Ok(()),
        };
        result
    }

    /// Wait until the listener is bound and return its local address.
    ///
    /// Returns `None` when the server went away without ever binding.
    pub async fn bound_addr(&self) -> Option<SocketAddr> {
        let mut addr = self.addr.clone();
        let result = match addr.wait_for(|bound| bound.is_some()).await {
            Ok(bound) => *bound,
            Err(_closed) => None,
        };
        result
    }
}

fn build_router(config: &Config) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .layer(TimeoutLayer::new(config.timeouts.read()))
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Service identity, with the version injected at compile time.
async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_port(port: &str) -> Config {
        Config {
            port: port.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn new_rejects_unbindable_port() {
        let err = Server::new(&config_with_port("not-a-port")).unwrap_err();
        assert!(matches!(err, ConstructError::InvalidAddress { .. }));
    }

    #[test]
    fn new_does_not_bind() {
        // Two servers on the same fixed port can coexist before serving.
        let first = Server::new(&config_with_port("8080")).unwrap();
        let second = Server::new(&config_with_port("8080")).unwrap();
        drop((first, second));
    }

    #[tokio::test]
    async fn serve_returns_closed_on_shutdown() {
        let server = Server::new(&config_with_port("0")).unwrap();
        let handle = server.handle();

        let serving = tokio::spawn(server.serve());
        handle.bound_addr().await.expect("server should bind");

        handle
            .shutdown(Duration::from_secs(5))
            .await
            .expect("drain should complete");

        let result = serving.await.unwrap();
        assert!(matches!(result, Err(ServeError::Closed)));
    }

    #[tokio::test]
    async fn shutdown_times_out_when_nothing_drains() {
        // Never call serve, so the drain signal can never fire.
        let server = Server::new(&config_with_port("0")).unwrap();
        let handle = server.handle();

        let err = handle.shutdown(Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, ShutdownError::DeadlineExceeded(_)));
        drop(server);
    }

    #[tokio::test]
    async fn shutdown_reports_vanished_server() {
        let server = Server::new(&config_with_port("0")).unwrap();
        let handle = server.handle();
        drop(server);

        let err = handle.shutdown(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, ShutdownError::Aborted));
    }

    #[tokio::test]
    async fn bind_failure_is_a_serve_error_with_trivial_drain() {
        let occupied = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let server = Server::new(&config_with_port(&port.to_string())).unwrap();
        let handle = server.handle();

        let err = server.serve().await.unwrap_err();
        assert!(matches!(err, ServeError::Bind { .. }));

        // Nothing was started, so the drain completes immediately.
        handle
            .shutdown(Duration::from_secs(1))
            .await
            .expect("drain of an unstarted server is trivial");
    }
}
