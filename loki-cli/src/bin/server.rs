// loki-mcp-server - serves the loki_query and calculate tools over stdio and HTTP/SSE

use anyhow::Result;
use clap::{Parser, ValueEnum};
use loki_cli::logging;
use loki_mcp::{create_server, Config};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Clone, Copy, ValueEnum, Debug)]
enum Transport {
    Stdio,
    Http,
    Both,
}

#[derive(Parser)]
#[command(name = "loki-mcp-server")]
#[command(about = "MCP server exposing Grafana Loki queries", long_about = None)]
#[command(version)]
struct Cli {
    /// Transport to serve
    #[arg(long, value_enum, default_value = "both")]
    transport: Transport,

    /// SSE listener port
    #[arg(long, env = "SSE_PORT", default_value = "8080")]
    port: u16,

    /// Loki endpoint used when a call passes no url
    #[arg(long, env = "LOKI_URL")]
    loki_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to JSON-RPC
    logging::init();

    let mut config = Config::from_env();
    if let Some(url) = cli.loki_url.filter(|url| !url.trim().is_empty()) {
        config.loki_url = url;
    }
    config.request_timeout = Duration::from_secs(cli.timeout_secs);

    let server = create_server(config).await?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            signal.cancel();
        }
    });

    let served = match cli.transport {
        Transport::Stdio => server.start_stdio(shutdown).await,
        Transport::Http => server.start_http(cli.port, shutdown).await,
        Transport::Both => server.start_both(cli.port, shutdown).await,
    };

    if let Err(e) = served {
        error!("MCP server failed: {}", e);
        eprintln!("MCP server failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
