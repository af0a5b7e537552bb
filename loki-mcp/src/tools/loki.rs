use chrono::Utc;
use loki_core::config::DEFAULT_LIMIT;
use loki_core::{format, Credentials, QueryExecutor, QueryRequest};
use rmcp::model::JsonObject;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ToolError;

/// Run a `loki_query` call: parse arguments, resolve the time window, build
/// the URL, query Loki and format the streams.
pub async fn loki_query(
    executor: &dyn QueryExecutor,
    default_url: &str,
    arguments: &JsonObject,
    cancel: &CancellationToken,
) -> Result<String, ToolError> {
    let request = parse_arguments(arguments, default_url)?;
    debug!("Parsed loki_query arguments for {}", request.url);

    let resolved = request.resolve_at(Utc::now())?;
    debug!(
        "Resolved query window {} .. {} (limit {})",
        resolved.start.to_rfc3339(),
        resolved.end.to_rfc3339(),
        resolved.limit
    );

    let result = executor
        .execute(&resolved.url, &request.credentials, cancel)
        .await
        .map_err(|e| {
            warn!("Loki query failed: {}", e);
            e
        })?;
    debug!("Loki returned {} streams", result.streams().len());

    Ok(format::format(&result))
}

/// Convert raw tool arguments into a typed request.
pub fn parse_arguments(arguments: &JsonObject, default_url: &str) -> Result<QueryRequest, ToolError> {
    let query = string_arg(arguments, "query")
        .ok_or_else(|| ToolError::MissingArgument("query".to_string()))?;
    if query.trim().is_empty() {
        return Err(ToolError::invalid("query", "cannot be empty"));
    }

    let url = string_arg(arguments, "url")
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| default_url.to_string());

    let credentials = Credentials::from_parts(
        string_arg(arguments, "username"),
        string_arg(arguments, "password"),
        string_arg(arguments, "token"),
    );

    let limit = match arguments.get("limit") {
        None | Some(Value::Null) => DEFAULT_LIMIT,
        Some(value) => parse_limit(value)?,
    };

    Ok(QueryRequest {
        query,
        url,
        credentials,
        start: string_arg(arguments, "start"),
        end: string_arg(arguments, "end"),
        limit,
    })
}

fn string_arg(arguments: &JsonObject, name: &str) -> Option<String> {
    arguments.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Limits arrive as JSON numbers; fractions truncate toward zero.
fn parse_limit(value: &Value) -> Result<u64, ToolError> {
    if let Some(limit) = value.as_u64() {
        return Ok(limit);
    }
    match value.as_f64() {
        Some(limit) if limit >= 0.0 && limit.is_finite() => Ok(limit.trunc() as u64),
        Some(_) => Err(ToolError::invalid("limit", "must be non-negative")),
        None => Err(ToolError::invalid("limit", "must be a number")),
    }
}
