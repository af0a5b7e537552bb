use loki_core::config::{default_loki_url, DEFAULT_LOKI_URL, DEFAULT_REQUEST_TIMEOUT};
use loki_core::HttpQueryExecutor;
use std::sync::Arc;
use std::time::Duration;

pub mod client;
pub mod error;
pub mod schema;
pub mod server;
pub mod tools;
pub mod transport;
pub mod validation;

/// Configuration for MCP server
#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    /// Loki endpoint used when a call does not pass `url`
    pub loki_url: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: "loki-mcp".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            loki_url: DEFAULT_LOKI_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Default config with the Loki URL taken from `LOKI_URL`
    pub fn from_env() -> Self {
        Self {
            loki_url: default_loki_url(),
            ..Self::default()
        }
    }
}

/// Factory function to create MCP server backed by the HTTP executor
pub async fn create_server(config: Config) -> anyhow::Result<McpServer> {
    let executor = HttpQueryExecutor::with_timeout(config.request_timeout)?;
    Ok(McpServer::new(config, Arc::new(executor)))
}

// Re-export the server struct
pub use server::McpServer;
