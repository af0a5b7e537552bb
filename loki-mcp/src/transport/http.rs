use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use crate::server::LokiMcpHandler;

pub const SSE_PATH: &str = "/sse";
pub const POST_PATH: &str = "/mcp";

pub async fn run_http_server(
    handler: Arc<LokiMcpHandler>,
    port: u16,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("Starting SSE MCP server on {}", addr);

    let server_handler = handler.as_ref().clone();

    let server = SseServer::serve_with_config(SseServerConfig {
        bind: addr.parse()?,
        sse_path: SSE_PATH.to_string(),
        post_path: POST_PATH.to_string(),
        ct: shutdown.child_token(),
        sse_keep_alive: None,
    })
    .await?
    .with_service_directly(move || server_handler.clone());

    tracing::info!("SSE MCP server listening on port {}", port);
    tracing::info!("Available endpoints: SSE {}, POST {}", SSE_PATH, POST_PATH);

    shutdown.cancelled().await;
    tracing::info!("Shutting down SSE MCP server...");
    server.cancel();

    Ok(())
}
