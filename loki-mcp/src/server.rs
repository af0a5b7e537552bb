use loki_core::QueryExecutor;
use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerInfo, Tool,
    },
    ServerHandler,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::tools::{calculate, loki_query};
use crate::Config;

/// Main MCP server structure
#[derive(Clone)]
pub struct McpServer {
    pub config: Config,
    executor: Arc<dyn QueryExecutor>,
}

impl McpServer {
    /// Create new MCP server instance
    pub fn new(config: Config, executor: Arc<dyn QueryExecutor>) -> Self {
        Self { config, executor }
    }

    /// Get config reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tools advertised by `tools/list`
    pub fn tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "loki_query".into(),
                description: Some("Run a query against Grafana Loki".into()),
                input_schema: Arc::new(crate::schema::loki_query_schema(&self.config.loki_url)),
                annotations: None,
            },
            Tool {
                name: "calculate".into(),
                description: Some("Perform basic arithmetic operations".into()),
                input_schema: Arc::new(crate::schema::calculate_schema()),
                annotations: None,
            },
        ]
    }

    /// Dispatch one tool call.
    ///
    /// Business failures come back as an `isError` result; only an unknown
    /// tool name is a protocol error.
    pub async fn call(
        &self,
        tool_name: &str,
        arguments: &JsonObject,
        cancel: &CancellationToken,
    ) -> Result<CallToolResult, rmcp::Error> {
        debug!("Calling tool {}", tool_name);

        let outcome = match crate::validation::validate_tool_params(tool_name, arguments) {
            Err(ToolError::UnknownTool(name)) => return Err(ToolError::UnknownTool(name).into()),
            Err(e) => Err(e),
            Ok(()) => match tool_name {
                "loki_query" => {
                    loki_query(self.executor.as_ref(), &self.config.loki_url, arguments, cancel).await
                }
                "calculate" => calculate(arguments),
                _ => return Err(ToolError::UnknownTool(tool_name.to_string()).into()),
            },
        };

        match outcome {
            Ok(text) => Ok(CallToolResult {
                content: vec![Content::text(text)],
                is_error: Some(false),
            }),
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                Ok(CallToolResult {
                    content: vec![Content::text(e.to_string())],
                    is_error: Some(true),
                })
            }
        }
    }

    /// Create a handler for this server
    pub fn create_handler(&self) -> LokiMcpHandler {
        LokiMcpHandler::new(Arc::new(self.clone()))
    }

    /// Start the MCP server with stdio transport
    /// Logging must go to stderr: stdout carries the JSON-RPC stream
    pub async fn start_stdio(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
        use crate::transport::{create_and_run_transport, TransportType};

        let handler = Arc::new(self.create_handler());
        self.log_startup("stdio");
        create_and_run_transport(TransportType::Stdio, handler, shutdown).await
    }

    /// Start the MCP server with HTTP/SSE transport
    pub async fn start_http(&self, port: u16, shutdown: CancellationToken) -> anyhow::Result<()> {
        use crate::transport::{create_and_run_transport, TransportType};

        let handler = Arc::new(self.create_handler());
        self.log_startup("HTTP");
        create_and_run_transport(TransportType::Http { port }, handler, shutdown).await
    }

    /// Serve stdio and HTTP/SSE side by side until shutdown
    pub async fn start_both(&self, port: u16, shutdown: CancellationToken) -> anyhow::Result<()> {
        use crate::transport::{create_and_run_transport, TransportType};

        let handler = Arc::new(self.create_handler());
        self.log_startup("stdio + HTTP");
        create_and_run_transport(TransportType::Both { port }, handler, shutdown).await
    }

    fn log_startup(&self, transport: &str) {
        tracing::info!("Starting Loki MCP server with {} transport", transport);
        tracing::info!("Server name: {}", self.config.server_name);
        tracing::info!("Server version: {}", self.config.server_version);
        tracing::info!("Default Loki URL: {}", self.config.loki_url);
        tracing::info!("Available tools: loki_query, calculate");
    }
}

/// MCP Server Handler implementing the RMCP ServerHandler trait
#[derive(Clone)]
pub struct LokiMcpHandler {
    pub server: Arc<McpServer>,
}

impl LokiMcpHandler {
    pub fn new(server: Arc<McpServer>) -> Self {
        Self { server }
    }
}

impl ServerHandler for LokiMcpHandler {
    fn get_info(&self) -> ServerInfo {
        let config = self.server.config();
        ServerInfo {
            instructions: Some("Query Grafana Loki for logs with LogQL. Use loki_query with a query and optional url, credentials, start, end and limit.".into()),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: config.server_name.clone(),
                version: config.server_version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> Result<ListToolsResult, rmcp::Error> {
        Ok(ListToolsResult {
            tools: self.server.tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> Result<CallToolResult, rmcp::Error> {
        let arguments = request.arguments.unwrap_or_default();
        self.server
            .call(request.name.as_ref(), &arguments, &context.ct)
            .await
    }
}
