// Client half of the stdio transport: spawns a server process and exchanges
// newline-delimited JSON-RPC messages over its pipes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to start server: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("server {0} pipe unavailable")]
    MissingPipe(&'static str),
    #[error("failed to send request: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to read response: {0}")]
    Read(#[source] std::io::Error),
    #[error("server closed the connection before responding")]
    Closed,
    #[error("malformed message from server: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("error from server ({code}): {message}")]
    Rpc { code: i64, message: String },
    #[error("response {0} carried neither result nor error")]
    MissingResult(String),
    #[error("failed to kill server process: {0}")]
    Kill(#[source] std::io::Error),
}

/// JSON-RPC request or notification
#[derive(Debug, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC response; server notifications deserialize here too with `id` unset
#[derive(Debug, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// Result of a `tools/call` request
#[derive(Debug, Clone, Deserialize)]
pub struct ToolResult {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl ToolResult {
    /// Concatenated text content
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|item| item.kind == "text")
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A server process driven over its stdin/stdout.
pub struct StdioClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl StdioClient {
    /// Spawn `command` with piped stdin/stdout; stderr is inherited.
    pub fn spawn(mut command: Command) -> Result<Self, TransportError> {
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(TransportError::Spawn)?;
        let stdin = child
            .stdin
            .take()
            .ok_or(TransportError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(TransportError::MissingPipe("stdout"))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        })
    }

    /// MCP lifecycle handshake: `initialize` then `notifications/initialized`
    pub async fn initialize(&mut self, client_name: &str, client_version: &str) -> Result<Value, TransportError> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": client_name, "version": client_version }
                }),
            )
            .await?;
        self.send(&Request {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method: "notifications/initialized".to_string(),
            params: None,
        })
        .await?;
        Ok(result)
    }

    /// Issue one `tools/call` and wait for its response
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Map<String, Value>,
    ) -> Result<ToolResult, TransportError> {
        let result = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Kill the server process. Always called once the exchange is over.
    pub async fn shutdown(mut self) -> Result<(), TransportError> {
        self.child.kill().await.map_err(TransportError::Kill)
    }

    async fn request(&mut self, method: &str, params: Value) -> Result<Value, TransportError> {
        let id = self.next_id.to_string();
        self.next_id += 1;

        self.send(&Request {
            jsonrpc: JSONRPC_VERSION,
            id: Some(id.clone()),
            method: method.to_string(),
            params: Some(params),
        })
        .await?;

        loop {
            let response = self.read_message().await?;
            if response.id.as_ref().and_then(Value::as_str) != Some(id.as_str()) {
                debug!(
                    "Skipping unrelated message (id {:?}, method {:?})",
                    response.id, response.method
                );
                continue;
            }

            if let Some(error) = response.error {
                return Err(TransportError::Rpc {
                    code: error.code,
                    message: error.message,
                });
            }
            return response.result.ok_or(TransportError::MissingResult(id));
        }
    }

    async fn send(&mut self, request: &Request) -> Result<(), TransportError> {
        let mut line = serde_json::to_string(request)?;
        debug!("Sending request: {}", line);
        line.push('\n');

        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::Write)?;
        self.stdin.flush().await.map_err(TransportError::Write)
    }

    /// Read the next non-blank line. A final line cut off by EOF still counts.
    async fn read_message(&mut self) -> Result<Response, TransportError> {
        loop {
            let mut line = String::new();
            let read = self
                .stdout
                .read_line(&mut line)
                .await
                .map_err(TransportError::Read)?;
            if read == 0 {
                return Err(TransportError::Closed);
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!("Received response: {}", line);
            return Ok(serde_json::from_str(line)?);
        }
    }
}
