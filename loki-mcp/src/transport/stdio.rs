use rmcp::{service::serve_server, transport::io::stdio};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use crate::server::LokiMcpHandler;

/// Serve MCP over this process's stdin/stdout.
///
/// Returns when the peer closes stdin or `shutdown` fires.
pub async fn run_stdio_server(
    handler: Arc<LokiMcpHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    // Get stdio transport
    let (stdin, stdout) = stdio();

    let handler_clone = (*handler).clone();

    tokio::select! {
        served = async {
            let service = serve_server(handler_clone, (stdin, stdout)).await?;
            let reason = service.waiting().await?;
            tracing::info!("stdio transport closed: {:?}", reason);
            anyhow::Ok(())
        } => served,
        _ = shutdown.cancelled() => Ok(()),
    }
}
