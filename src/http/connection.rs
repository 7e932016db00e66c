use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::parser::request_from_reader_with_capacity;
use crate::http::writer::{ResponseWriter, WriterState};
use crate::server::handler::{Handler, HandlerError};

/// One accepted connection: parse a single request, hand it to the
/// handler, close.
///
/// `peer` is only used to label log lines.
pub struct Connection<S, H> {
    stream: S,
    peer: String,
    handler: Arc<H>,
    buffer_size: usize,
}

impl<S, H> Connection<S, H>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler<S>,
{
    pub fn new(stream: S, peer: impl Into<String>, handler: Arc<H>, buffer_size: usize) -> Self {
        Self {
            stream,
            peer: peer.into(),
            handler,
            buffer_size,
        }
    }

    /// Runs the connection to completion. The stream is shut down on the
    /// success path and dropped on every other one.
    pub async fn run(self) -> anyhow::Result<()> {
        let Connection {
            mut stream,
            peer,
            handler,
            buffer_size,
        } = self;

        let parsed = request_from_reader_with_capacity(&mut stream, buffer_size).await;
        let mut writer = ResponseWriter::new(stream);

        match parsed {
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "Rejecting request");
                HandlerError::bad_request(e.to_string())
                    .write_to(&mut writer)
                    .await
                    .context("failed to write 400 response")?;
            }

            Ok(request) => {
                tracing::info!(
                    peer = %peer,
                    method = %request.method(),
                    target = %request.target(),
                    body_len = request.body.len(),
                    "Handling request"
                );

                if let Err(e) = handler.handle(&mut writer, &request).await {
                    respond_with_error(&mut writer, &peer, e).await?;
                }
            }
        }

        writer.flush().await.context("failed to flush response")?;

        let mut stream = writer.into_inner();
        stream.shutdown().await.context("failed to close connection")?;

        Ok(())
    }
}

async fn respond_with_error<S>(
    writer: &mut ResponseWriter<S>,
    peer: &str,
    err: HandlerError,
) -> anyhow::Result<()>
where
    S: AsyncWrite + Unpin,
{
    if writer.state() != WriterState::Initial {
        // Part of a response is already on the wire; nothing sane to add.
        tracing::warn!(
            peer = %peer,
            error = %err,
            state = ?writer.state(),
            "Handler failed after the response was started"
        );
        return Ok(());
    }

    tracing::warn!(peer = %peer, error = %err, "Handler returned an error");
    err.write_to(writer)
        .await
        .context("failed to write handler error response")
}
