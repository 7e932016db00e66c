//! A reader that hands out at most `bytes_per_read` bytes per call.
//!
//! Real sockets deliver data in whatever pieces the network feels like. This
//! reader makes those pieces small and predictable so the parser can be
//! checked against every possible split, down to one byte at a time.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

#[derive(Debug, Clone)]
pub struct ChunkReader {
    data: Vec<u8>,
    bytes_per_read: usize,
    pos: usize,
}

impl ChunkReader {
    /// `bytes_per_read` of zero is treated as one.
    pub fn new(data: impl Into<Vec<u8>>, bytes_per_read: usize) -> Self {
        Self {
            data: data.into(),
            bytes_per_read: bytes_per_read.max(1),
            pos: 0,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let n = self
            .bytes_per_read
            .min(self.remaining())
            .min(buf.remaining());

        let start = self.pos;
        buf.put_slice(&self.data[start..start + n]);
        self.pos += n;

        Poll::Ready(Ok(()))
    }
}
