use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::http::connection::Connection;
use crate::server::Shared;
use crate::server::handler::Handler;

const MIN_ACCEPT_BACKOFF: Duration = Duration::from_millis(5);
const MAX_ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Accepts connections until shutdown is signalled, spawning one task per
/// connection. The listener is dropped, and the port released, on return.
pub(crate) async fn run<H>(
    listener: TcpListener,
    handler: Arc<H>,
    shared: Arc<Shared>,
    mut shutdown: watch::Receiver<bool>,
    buffer_size: usize,
) where
    H: Handler,
{
    let mut failures: u32 = 0;

    loop {
        tokio::select! {
            biased;

            // Fires on close(), or when the server handle is dropped.
            _ = shutdown.changed() => break,

            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        if shared.closed.load(Ordering::Acquire) {
                            break;
                        }
                        failures = failures.saturating_add(1);
                        let delay = accept_backoff(failures);
                        tracing::warn!(error = %e, retry_in = ?delay, "Accept failed");

                        // Errors like EMFILE persist; wait, but stay responsive to close().
                        let stop = tokio::select! {
                            biased;
                            _ = shutdown.changed() => true,
                            _ = tokio::time::sleep(delay) => false,
                        };
                        if stop {
                            break;
                        }
                        continue;
                    }
                };
                failures = 0;
                info!("Accepted connection from {}", peer);

                let guard = shared.enter();
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let _guard = guard;
                    let conn = Connection::new(socket, peer.to_string(), handler, buffer_size);
                    if let Err(e) = conn.run().await {
                        tracing::error!("Connection error from {}: {:#}", peer, e);
                    }
                });
            }
        }
    }

    info!("Stopped accepting connections");
}

/// Doubles from [`MIN_ACCEPT_BACKOFF`] per consecutive failure, capped at
/// [`MAX_ACCEPT_BACKOFF`].
fn accept_backoff(failures: u32) -> Duration {
    let exp = failures.saturating_sub(1).min(16);
    MIN_ACCEPT_BACKOFF
        .saturating_mul(1 << exp)
        .min(MAX_ACCEPT_BACKOFF)
}
