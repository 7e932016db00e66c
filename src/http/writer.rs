use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::error::WriteError;
use crate::http::headers::Headers;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Progress of a response on the wire.
///
/// ```text
/// Initial ─status line─▶ StatusLineWritten ─headers─▶ HeadersWritten ─0-chunk─▶ BodyWritten
///                                                       │  ▲                       │  ▲
///                                                       └──┘ body / chunk          └──┘ trailers
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Initial,
    StatusLineWritten,
    HeadersWritten,
    BodyWritten,
}

/// Writes one response to `sink`, refusing out-of-order calls.
///
/// A rejected call writes nothing and leaves the state where it was. An I/O
/// failure also leaves the state unchanged, though some bytes may already
/// have reached the sink.
pub struct ResponseWriter<W> {
    sink: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::Initial,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// `HTTP/1.1 <code> <reason> \r\n`
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.require(WriterState::Initial, "write the status line")?;

        let line = format!(
            "{} {} {} \r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        );
        self.sink.write_all(line.as_bytes()).await?;

        self.advance(WriterState::StatusLineWritten);
        Ok(())
    }

    /// Writes every field in table order, then the blank line.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.require(WriterState::StatusLineWritten, "write headers")?;

        self.sink.write_all(&serialize_fields(headers)).await?;

        self.advance(WriterState::HeadersWritten);
        Ok(())
    }

    /// Writes raw body bytes. May be called repeatedly for one fixed-length body.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.require(WriterState::HeadersWritten, "write the body")?;

        self.sink.write_all(body).await?;
        Ok(body.len())
    }

    /// Writes one chunk as `<hex-size>\r\n<bytes>\r\n`.
    ///
    /// An empty slice is skipped, since a zero-size chunk would end the body.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriteError> {
        self.require(WriterState::HeadersWritten, "write a body chunk")?;

        if chunk.is_empty() {
            return Ok(0);
        }

        let mut frame = Vec::with_capacity(chunk.len() + 16);
        frame.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        frame.extend_from_slice(chunk);
        frame.extend_from_slice(b"\r\n");
        self.sink.write_all(&frame).await?;

        Ok(chunk.len())
    }

    /// Writes the terminal `0\r\n` chunk.
    ///
    /// The message is not complete until [`write_trailers`](Self::write_trailers)
    /// adds the final blank line; pass an empty table when there are no trailers.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), WriteError> {
        self.require(WriterState::HeadersWritten, "finish a chunked body")?;

        self.sink.write_all(b"0\r\n").await?;

        self.advance(WriterState::BodyWritten);
        Ok(())
    }

    /// Writes trailer fields and the closing blank line after a chunked body.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        self.require(WriterState::BodyWritten, "write trailers")?;

        self.sink.write_all(&serialize_fields(trailers)).await?;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriteError> {
        self.sink.flush().await?;
        Ok(())
    }

    fn require(&self, expected: WriterState, operation: &'static str) -> Result<(), WriteError> {
        if self.state != expected {
            return Err(WriteError::OutOfOrderWrite {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn advance(&mut self, next: WriterState) {
        tracing::debug!(from = ?self.state, to = ?next, "Response writer state change");
        self.state = next;
    }
}

fn serialize_fields(headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();

    for (name, value) in headers.iter() {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Section terminator
    buf.extend_from_slice(b"\r\n");

    buf
}
