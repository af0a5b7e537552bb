use anyhow::{Context, Result};
use loki_mcp::client::{StdioClient, ToolResult, TransportError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// File name of the server binary built alongside the client
pub const SERVER_BINARY: &str = "loki-mcp-server";

/// `loki-mcp-server` in the directory of the running executable
pub fn default_server_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let dir = exe
        .parent()
        .context("running executable has no parent directory")?;
    Ok(dir.join(format!("{}{}", SERVER_BINARY, std::env::consts::EXE_SUFFIX)))
}

/// Spawn the server over stdio, make exactly one tool call, then kill it.
pub async fn call_once(
    server: &Path,
    tool: &str,
    arguments: Map<String, Value>,
) -> Result<ToolResult, TransportError> {
    debug!("Spawning {}", server.display());
    let mut command = Command::new(server);
    command.args(["--transport", "stdio"]);

    let mut client = StdioClient::spawn(command)?;
    let outcome = exchange(&mut client, tool, arguments).await;

    if let Err(e) = client.shutdown().await {
        warn!("{}", e);
    }
    outcome
}

async fn exchange(
    client: &mut StdioClient,
    tool: &str,
    arguments: Map<String, Value>,
) -> Result<ToolResult, TransportError> {
    client
        .initialize("loki-client", env!("CARGO_PKG_VERSION"))
        .await?;
    client.call_tool(tool, arguments).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_path_is_sibling() {
        let path = default_server_path().unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(path.parent(), exe.parent());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SERVER_BINARY));
    }
}
