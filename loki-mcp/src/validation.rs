use rmcp::model::JsonObject;
use serde_json::Value;

use crate::error::ToolError;

const LOKI_STRING_PARAMS: [&str; 6] = ["url", "username", "password", "token", "start", "end"];

/// Validate input parameters against the expected schema
pub fn validate_tool_params(tool_name: &str, params: &JsonObject) -> Result<(), ToolError> {
    match tool_name {
        "loki_query" => validate_loki_query(params),
        "calculate" => validate_calculate(params),
        _ => Err(ToolError::UnknownTool(tool_name.to_string())),
    }
}

fn validate_loki_query(params: &JsonObject) -> Result<(), ToolError> {
    let query = params
        .get("query")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MissingArgument("query".to_string()))?;

    if query.trim().is_empty() {
        return Err(ToolError::invalid("query", "cannot be empty"));
    }

    for name in LOKI_STRING_PARAMS {
        match params.get(name) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => return Err(ToolError::invalid(name, "must be a string")),
        }
    }

    match params.get("limit") {
        None | Some(Value::Null) => {}
        Some(limit) => {
            let limit = limit
                .as_f64()
                .ok_or_else(|| ToolError::invalid("limit", "must be a number"))?;
            if limit < 0.0 {
                return Err(ToolError::invalid("limit", "must be non-negative"));
            }
        }
    }

    Ok(())
}

fn validate_calculate(params: &JsonObject) -> Result<(), ToolError> {
    match params.get("operation") {
        Some(Value::String(_)) => {}
        Some(_) => return Err(ToolError::invalid("operation", "must be a string")),
        None => return Err(ToolError::MissingArgument("operation".to_string())),
    }

    for name in ["x", "y"] {
        match params.get(name) {
            Some(value) if value.is_number() => {}
            Some(_) => return Err(ToolError::invalid(name, "must be a number")),
            None => return Err(ToolError::MissingArgument(name.to_string())),
        }
    }

    Ok(())
}
