use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::error::ParseError;
use crate::http::request::Request;

/// Starting size of the read buffer. It doubles whenever it fills up.
pub const DEFAULT_BUFFER_SIZE: usize = 8;

/// Reads one request from `reader`, using [`DEFAULT_BUFFER_SIZE`].
pub async fn request_from_reader<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    request_from_reader_with_capacity(reader, DEFAULT_BUFFER_SIZE).await
}

/// Reads bytes until the request is complete.
///
/// The buffer holds `filled` bytes that have been read but not yet consumed.
/// After every parse pass the consumed prefix is shifted out, so leftovers
/// stay contiguous at the front until the next read completes them.
pub async fn request_from_reader_with_capacity<R>(
    reader: &mut R,
    initial_capacity: usize,
) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; initial_capacity.max(1)];
    let mut filled = 0;
    let mut request = Request::new();

    while !request.is_done() {
        if filled == buf.len() {
            buf.resize(buf.len() * 2, 0);
            tracing::trace!(capacity = buf.len(), "Grew request buffer");
        }

        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            return Err(ParseError::IncompleteRequest {
                state: request.state(),
            });
        }
        filled += n;

        let consumed = request.parse(&buf[..filled])?;
        if consumed == 0 {
            continue;
        }

        buf.copy_within(consumed..filled, 0);
        filled -= consumed;
    }

    Ok(request)
}
