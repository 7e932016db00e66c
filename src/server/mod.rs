//! Accept loop and graceful shutdown.
//!
//! [`Server::serve`] binds, spawns the accept loop and returns right away.
//! Each accepted connection runs in its own task. [`Server::close`] stops
//! accepting and then waits for every connection already in progress; it
//! never aborts one.
//!
//! The accept loop and the connection tasks share only two counters: the
//! `closed` flag and the number of in-flight connections. Both are atomics.

pub mod handler;
mod listener;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;

pub use handler::{Handler, HandlerError};

/// State shared between the server handle, the accept loop and connection tasks.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) closed: AtomicBool,
    in_flight: AtomicUsize,
    drained: Notify,
}

impl Shared {
    /// Counts a connection as in flight until the returned guard is dropped.
    pub(crate) fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            shared: Arc::clone(self),
        }
    }

    async fn wait_for_drain(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a release between the load and the
            // await is not missed.
            notified.as_mut().enable();

            if self.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Decrements the in-flight count on drop, including when a handler panics.
pub(crate) struct InFlightGuard {
    shared: Arc<Shared>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.shared.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.drained.notify_waiters();
        }
    }
}

/// Handle to a running server.
pub struct Server {
    local_addr: SocketAddr,
    shared: Arc<Shared>,
    shutdown_tx: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Serves `handler` on `port` with otherwise default settings.
    pub async fn serve<H>(port: u16, handler: H) -> anyhow::Result<Self>
    where
        H: Handler,
    {
        let cfg = ServerConfig {
            port,
            ..ServerConfig::default()
        };
        Self::serve_with_config(&cfg, handler).await
    }

    pub async fn serve_with_config<H>(cfg: &ServerConfig, handler: H) -> anyhow::Result<Self>
    where
        H: Handler,
    {
        let addr = cfg.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let shared = Arc::new(Shared::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let accept_task = tokio::spawn(listener::run(
            listener,
            Arc::new(handler),
            Arc::clone(&shared),
            shutdown_rx,
            cfg.initial_buffer_size,
        ));

        Ok(Self {
            local_addr,
            shared,
            shutdown_tx,
            accept_task,
        })
    }

    /// The bound address; useful when serving on port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Connections currently being handled.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Stops accepting, releases the port, then waits for every connection
    /// that was already accepted to finish.
    pub async fn close(self) -> anyhow::Result<()> {
        info!(in_flight = self.in_flight(), "Shutting down server");

        self.shared.closed.store(true, Ordering::Release);
        // Err only means the accept loop has already exited.
        let _ = self.shutdown_tx.send(true);

        self.accept_task
            .await
            .context("accept loop terminated abnormally")?;

        self.shared.wait_for_drain().await;

        info!("Server closed");
        Ok(())
    }
}
