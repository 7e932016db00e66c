//! HTTP/1.1 message framing.
//!
//! Nothing here depends on an HTTP library; requests are recognised byte by
//! byte and responses are written field by field.
//!
//! - **`headers`**: ordered, case-insensitive header table and header-line parsing
//! - **`request`**: the request being assembled and its parser state machine
//! - **`parser`**: the read loop that feeds a connection's bytes to a request
//! - **`response`**: status codes and the default response headers
//! - **`writer`**: serializes a response, enforcing protocol order
//! - **`connection`**: one connection, from first byte read to close
//! - **`chunk_reader`**: a reader that delivers tiny, fixed-size chunks
//! - **`error`**: parse and write error types
//!
//! # Request parser
//!
//! ```text
//!   ┌─────────────┐  request line  ┌────────────────┐  blank line  ┌─────────────┐
//!   │ Initialized │ ─────────────▶ │ ParsingHeaders │ ───────────▶ │ ParsingBody │
//!   └─────────────┘                └───────┬────────┘              └──────┬──────┘
//!                                     ▲    │ header line                  │ Content-Length
//!                                     └────┘                              ▼ bytes read
//!                                                                    ┌──────┐
//!                                                                    │ Done │
//!                                                                    └──────┘
//! ```
//!
//! Each step either consumes a complete unit or consumes nothing, which tells
//! the read loop to wait for more bytes. Delimiters may be split across any
//! number of reads.
//!
//! # Example
//!
//! ```
//! use httpframe::http::chunk_reader::ChunkReader;
//! use httpframe::http::parser::request_from_reader;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut reader = ChunkReader::new("GET /coffee HTTP/1.1\r\nHost: localhost\r\n\r\n", 1);
//! let request = request_from_reader(&mut reader).await.unwrap();
//!
//! assert_eq!(request.method(), "GET");
//! assert_eq!(request.target(), "/coffee");
//! assert_eq!(request.header("host"), Some("localhost"));
//! # }
//! ```

pub mod chunk_reader;
pub mod connection;
pub mod error;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
