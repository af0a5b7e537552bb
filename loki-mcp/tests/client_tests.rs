// Stdio client tests against a scripted stand-in server
#![cfg(unix)]

use loki_mcp::client::{StdioClient, TransportError};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;

const INIT_REPLY: &str = r#"{"jsonrpc":"2.0","id":"1","result":{"protocolVersion":"2024-11-05","capabilities":{"tools":{}},"serverInfo":{"name":"fake","version":"0.0.0"}}}"#;

fn scripted_server(script: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(script);
    command
}

fn arguments(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_handshake_and_tool_call() {
    // Removed on drop, even when an assertion below fails
    let capture = NamedTempFile::new().unwrap();
    let script = format!(
        r#"read -r init
printf '%s\n' "$init" > "$CAPTURE"
printf '%s\n' '{INIT_REPLY}'
read -r initialized
printf '%s\n' "$initialized" >> "$CAPTURE"
read -r call
printf '%s\n' "$call" >> "$CAPTURE"
printf '%s\n' '{{"jsonrpc":"2.0","method":"notifications/message","params":{{"level":"info","data":"working"}}}}'
printf '\n'
printf '%s\n' '{{"jsonrpc":"2.0","id":"2","result":{{"content":[{{"type":"text","text":"Found 1 streams:"}}],"isError":false}}}}'
sleep 30
"#
    );
    let mut command = scripted_server(&script);
    command.env("CAPTURE", capture.path());

    let mut client = StdioClient::spawn(command).unwrap();
    let info = client.initialize("loki-client", "0.1.0").await.unwrap();
    assert_eq!(info["serverInfo"]["name"], json!("fake"));

    let result = client
        .call_tool("loki_query", arguments(json!({"query": "{job=\"varlogs\"}"})))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(result.text(), "Found 1 streams:");

    tokio::time::timeout(Duration::from_secs(5), client.shutdown())
        .await
        .expect("shutdown should not hang")
        .unwrap();

    let written = std::fs::read_to_string(capture.path()).unwrap();
    let lines: Vec<Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["jsonrpc"], json!("2.0"));
    assert_eq!(lines[0]["id"], json!("1"));
    assert_eq!(lines[0]["method"], json!("initialize"));
    assert_eq!(lines[0]["params"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(lines[0]["params"]["clientInfo"]["name"], json!("loki-client"));

    assert_eq!(lines[1]["method"], json!("notifications/initialized"));
    assert!(lines[1].get("id").is_none());

    assert_eq!(lines[2]["id"], json!("2"));
    assert_eq!(lines[2]["method"], json!("tools/call"));
    assert_eq!(lines[2]["params"]["name"], json!("loki_query"));
    assert_eq!(lines[2]["params"]["arguments"]["query"], json!("{job=\"varlogs\"}"));
}

#[tokio::test]
async fn test_tool_error_result() {
    let script = format!(
        r#"read -r init
printf '%s\n' '{INIT_REPLY}'
read -r initialized
read -r call
printf '%s\n' '{{"jsonrpc":"2.0","id":"2","result":{{"content":[{{"type":"text","text":"Division by zero"}}],"isError":true}}}}'
"#
    );
    let mut client = StdioClient::spawn(scripted_server(&script)).unwrap();
    client.initialize("loki-client", "0.1.0").await.unwrap();

    let result = client
        .call_tool("calculate", arguments(json!({"operation": "divide", "x": 1, "y": 0})))
        .await
        .unwrap();
    assert!(result.is_error);
    assert_eq!(result.text(), "Division by zero");
    client.shutdown().await.ok();
}

#[tokio::test]
async fn test_last_line_without_newline_accepted() {
    let script = format!(
        r#"read -r init
printf '%s\n' '{INIT_REPLY}'
read -r initialized
read -r call
printf '%s' '{{"jsonrpc":"2.0","id":"2","result":{{"content":[{{"type":"text","text":"8"}}]}}}}'
"#
    );
    let mut client = StdioClient::spawn(scripted_server(&script)).unwrap();
    client.initialize("loki-client", "0.1.0").await.unwrap();

    let result = client
        .call_tool("calculate", arguments(json!({"operation": "add", "x": 5, "y": 3})))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(result.text(), "8");
    client.shutdown().await.ok();
}

#[tokio::test]
async fn test_rpc_error_surfaces() {
    let script = format!(
        r#"read -r init
printf '%s\n' '{INIT_REPLY}'
read -r initialized
read -r call
printf '%s\n' '{{"jsonrpc":"2.0","id":"2","error":{{"code":-32602,"message":"Unknown tool: nope"}}}}'
"#
    );
    let mut client = StdioClient::spawn(scripted_server(&script)).unwrap();
    client.initialize("loki-client", "0.1.0").await.unwrap();

    let err = client.call_tool("nope", serde_json::Map::new()).await.unwrap_err();
    match err {
        TransportError::Rpc { code, message } => {
            assert_eq!(code, -32602);
            assert_eq!(message, "Unknown tool: nope");
        }
        other => panic!("unexpected error: {other}"),
    }
    client.shutdown().await.ok();
}

#[tokio::test]
async fn test_server_exits_before_responding() {
    let script = "read -r init\nexit 0\n";
    let mut client = StdioClient::spawn(scripted_server(script)).unwrap();

    let err = client.initialize("loki-client", "0.1.0").await.unwrap_err();
    assert!(matches!(err, TransportError::Closed), "{err}");
}

#[tokio::test]
async fn test_malformed_response() {
    let script = "read -r init\nprintf 'not json\\n'\nsleep 30\n";
    let mut client = StdioClient::spawn(scripted_server(script)).unwrap();

    let err = client.initialize("loki-client", "0.1.0").await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "{err}");
    client.shutdown().await.ok();
}

#[tokio::test]
async fn test_spawn_failure() {
    let command = Command::new("/nonexistent/loki-mcp-server");
    let err = StdioClient::spawn(command).err().unwrap();
    assert!(matches!(err, TransportError::Spawn(_)));
}
