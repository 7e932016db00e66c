//! httpframe - HTTP/1.1 framing over raw TCP
//!
//! Incremental request parsing, an order-enforcing response writer, and a
//! one-request-per-connection server with graceful shutdown.

pub mod config;
pub mod http;
pub mod server;
