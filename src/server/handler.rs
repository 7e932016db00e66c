use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

use crate::http::error::WriteError;
use crate::http::request::Request;
use crate::http::response::{StatusCode, default_headers};
use crate::http::writer::ResponseWriter;

/// User logic invoked once per parsed request.
///
/// The handler owns the whole response: it must drive `writer` through the
/// status line, headers and body in order. Returning an error before anything
/// was written makes the server answer with that error instead.
///
/// `S` is the connection's transport. [`Server`](crate::server::Server)
/// serves TCP, so handlers meant for it implement the default
/// `Handler<TcpStream>`; [`Connection`](crate::http::connection::Connection)
/// accepts any byte stream.
///
/// # Example
///
/// ```
/// use httpframe::http::request::Request;
/// use httpframe::http::response::{StatusCode, default_headers};
/// use httpframe::http::writer::ResponseWriter;
/// use httpframe::server::{Handler, HandlerError};
/// use tokio::net::TcpStream;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     async fn handle(
///         &self,
///         writer: &mut ResponseWriter<TcpStream>,
///         _request: &Request,
///     ) -> Result<(), HandlerError> {
///         let body = b"hello\n";
///         writer.write_status_line(StatusCode::Ok).await?;
///         writer.write_headers(&default_headers(body.len())).await?;
///         writer.write_body(body).await?;
///         Ok(())
///     }
/// }
/// ```
pub trait Handler<S = TcpStream>: Send + Sync + 'static {
    fn handle(
        &self,
        writer: &mut ResponseWriter<S>,
        request: &Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

/// An error response a handler wants sent in place of its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {message}", .status.as_u16())]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::InternalServerError, message)
    }

    /// Writes a complete plain-text response carrying `message` as the body.
    pub async fn write_to<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), WriteError>
    where
        W: AsyncWrite + Unpin,
    {
        let body = self.message.as_bytes();
        writer.write_status_line(self.status).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body).await?;
        writer.flush().await
    }
}

impl From<WriteError> for HandlerError {
    fn from(err: WriteError) -> Self {
        Self::internal(err.to_string())
    }
}
