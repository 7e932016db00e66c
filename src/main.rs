use httpframe::config::Config;
use httpframe::http::headers::Headers;
use httpframe::http::request::Request;
use httpframe::http::response::{StatusCode, default_headers};
use httpframe::http::writer::ResponseWriter;
use httpframe::server::{Handler, HandlerError, Server};
use tokio::net::TcpStream;
use tracing_subscriber::EnvFilter;

/// Demo handler: `/chunked` streams its answer, anything else gets a
/// fixed-length echo of the request line.
struct Demo;

impl Handler for Demo {
    async fn handle(
        &self,
        writer: &mut ResponseWriter<TcpStream>,
        request: &Request,
    ) -> Result<(), HandlerError> {
        if request.target() == "/chunked" {
            let mut headers = Headers::new();
            headers.set("Content-Type", "text/plain");
            headers.set("Transfer-Encoding", "chunked");
            headers.set("Trailer", "X-Body-Length");
            headers.set("Connection", "close");

            writer.write_status_line(StatusCode::Ok).await?;
            writer.write_headers(&headers).await?;

            let mut total = 0;
            for part in ["framed ", "by ", "hand\n"] {
                total += writer.write_chunked_body(part.as_bytes()).await?;
            }
            writer.write_chunked_body_done().await?;

            let mut trailers = Headers::new();
            trailers.set("X-Body-Length", &total.to_string());
            writer.write_trailers(&trailers).await?;
            return Ok(());
        }

        let body = format!(
            "{} {} HTTP/{}\n",
            request.method(),
            request.target(),
            request.version()
        );
        writer.write_status_line(StatusCode::Ok).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body.as_bytes()).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = Server::serve_with_config(&cfg.server, Demo).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.close().await
}
