//! Error types for request parsing and response writing.

use std::io;

use crate::http::request::ParserState;
use crate::http::writer::WriterState;

/// Everything that can go wrong while framing an incoming request.
///
/// The `Display` text is sent back to the client as the body of the
/// `400 Bad Request` response, so keep it short and free of internals.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("invalid character in header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("header name is empty")]
    EmptyHeaderName,

    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),

    #[error("body is longer than Content-Length ({read} > {declared})")]
    BodyOverflow { declared: usize, read: usize },

    #[error("incomplete request: stream ended while {state}")]
    IncompleteRequest { state: ParserState },

    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    #[error("attempted to parse data after the request was done")]
    ParseAfterDone,
}

/// Failures surfaced by [`ResponseWriter`](crate::http::writer::ResponseWriter).
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The handler called a write operation from a state that does not allow it.
    /// The writer's state is left untouched.
    #[error("cannot {operation} while writer is in state {state:?}")]
    OutOfOrderWrite {
        operation: &'static str,
        state: WriterState,
    },

    #[error("i/o error while writing response: {0}")]
    Io(#[from] io::Error),
}
