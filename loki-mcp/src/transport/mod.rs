use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use crate::server::LokiMcpHandler;

pub mod stdio;
pub mod http;

/// Transport types supported by the MCP server
#[derive(Debug, Clone)]
pub enum TransportType {
    Stdio,
    Http { port: u16 },
    Both { port: u16 },
}

/// Create a transport instance and run the server until it closes or
/// `shutdown` fires
pub async fn create_and_run_transport(
    transport_type: TransportType,
    handler: Arc<LokiMcpHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    match transport_type {
        TransportType::Stdio => {
            stdio::run_stdio_server(handler, shutdown).await?;
        }
        TransportType::Http { port } => {
            http::run_http_server(handler, port, shutdown).await?;
        }
        TransportType::Both { port } => {
            // A closed stdin ends the stdio side only; HTTP keeps serving
            tokio::try_join!(
                stdio::run_stdio_server(handler.clone(), shutdown.clone()),
                http::run_http_server(handler, port, shutdown),
            )?;
        }
    }
    Ok(())
}
