use rmcp::model::JsonObject;
use serde_json::{json, Value};

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

/// JSON schema for loki_query tool
pub fn loki_query_schema(default_url: &str) -> JsonObject {
    object(json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "LogQL query string"
            },
            "url": {
                "type": "string",
                "description": format!("Loki server URL (default: {} from LOKI_URL env var)", default_url),
                "default": default_url
            },
            "username": {
                "type": "string",
                "description": "Username for basic authentication"
            },
            "password": {
                "type": "string",
                "description": "Password for basic authentication"
            },
            "token": {
                "type": "string",
                "description": "Bearer token; takes precedence over username/password"
            },
            "start": {
                "type": "string",
                "description": "Start time for the query: now, -1h30m, RFC3339 or YYYY-MM-DD[ HH:MM:SS] (default: 1h ago)"
            },
            "end": {
                "type": "string",
                "description": "End time for the query, same formats as start (default: now)"
            },
            "limit": {
                "type": "number",
                "description": "Maximum number of entries to return (default: 100)",
                "minimum": 0
            }
        },
        "required": ["query"]
    }))
}

/// JSON schema for calculate tool
pub fn calculate_schema() -> JsonObject {
    object(json!({
        "type": "object",
        "properties": {
            "operation": {
                "type": "string",
                "enum": ["add", "subtract", "multiply", "divide"],
                "description": "The operation to perform"
            },
            "x": { "type": "number", "description": "First operand" },
            "y": { "type": "number", "description": "Second operand" }
        },
        "required": ["operation", "x", "y"]
    }))
}
