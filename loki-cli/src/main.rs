// loki-client - spawns loki-mcp-server over stdio and makes one tool call

use anyhow::Result;
use clap::{Parser, Subcommand};
use loki_cli::args::{self, AuthArgs};
use loki_cli::{call_once, default_server_path, logging};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "loki-client")]
#[command(about = "Query Grafana Loki through the Loki MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// Server binary to spawn (defaults to loki-mcp-server next to this binary)
    #[arg(long, env = "LOKI_MCP_SERVER")]
    server: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a LogQL query: loki_query [url] <query> [start] [end] [limit]
    #[command(name = "loki_query")]
    LokiQuery {
        /// Basic auth username
        #[arg(long)]
        username: Option<String>,

        /// Basic auth password
        #[arg(long)]
        password: Option<String>,

        /// Bearer token (takes precedence over basic auth)
        #[arg(long)]
        token: Option<String>,

        #[arg(required = true, num_args = 1..=5, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Four-function arithmetic: calculate <operation> <x> <y>
    Calculate {
        /// add, subtract, multiply or divide
        operation: String,

        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let server = match cli.server {
        Some(path) => path,
        None => default_server_path()?,
    };

    let (tool, arguments, describe) = match &cli.command {
        Commands::LokiQuery {
            username,
            password,
            token,
            args: positional,
        } => {
            let auth = AuthArgs {
                username: username.clone(),
                password: password.clone(),
                token: token.clone(),
            };
            let arguments = args::loki_query_arguments(positional, &auth)?;
            ("loki_query", arguments, None)
        }
        Commands::Calculate { operation, x, y } => {
            let arguments = args::calculate_arguments(operation, *x, *y)?;
            let describe = format!("{} {} {}", x, args::operation_symbol(operation), y);
            ("calculate", arguments, Some(describe))
        }
    };

    info!("Calling {} via {}", tool, server.display());
    let result = match call_once(&server, tool, arguments).await {
        Ok(result) => result,
        Err(e) => {
            error!("Transport error: {}", e);
            std::process::exit(1);
        }
    };

    let text = result.text();
    if result.is_error {
        eprintln!("{}", text);
        std::process::exit(1);
    }

    match describe {
        Some(expression) => println!("Result: {} = {}", expression, text.trim()),
        None => println!("{}", text),
    }
    Ok(())
}
