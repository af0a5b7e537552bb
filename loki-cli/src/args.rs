use anyhow::{bail, Result};
use serde_json::{Map, Number, Value};

/// Optional credential flags forwarded to `loki_query`
#[derive(Debug, Clone, Default)]
pub struct AuthArgs {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// Build `loki_query` arguments from `[url] <query> [start] [end] [limit]`.
///
/// The first token is taken as the URL when it starts with `http`.
pub fn loki_query_arguments(positional: &[String], auth: &AuthArgs) -> Result<Map<String, Value>> {
    let mut tokens = positional.iter();
    let mut arguments = Map::new();

    let mut next = tokens.next();
    if let Some(first) = next.filter(|token| token.starts_with("http")) {
        arguments.insert("url".to_string(), Value::String(first.clone()));
        next = tokens.next();
    }

    let Some(query) = next else {
        bail!("missing query: loki_query [url] <query> [start] [end] [limit]");
    };
    arguments.insert("query".to_string(), Value::String(query.clone()));

    for name in ["start", "end"] {
        if let Some(value) = tokens.next().filter(|value| !value.is_empty()) {
            arguments.insert(name.to_string(), Value::String(value.clone()));
        }
    }

    if let Some(limit) = tokens.next() {
        arguments.insert("limit".to_string(), parse_limit(limit)?);
    }

    let extra: Vec<&String> = tokens.collect();
    if !extra.is_empty() {
        bail!("unexpected arguments: {:?}", extra);
    }

    for (name, value) in [
        ("username", &auth.username),
        ("password", &auth.password),
        ("token", &auth.token),
    ] {
        if let Some(value) = value {
            arguments.insert(name.to_string(), Value::String(value.clone()));
        }
    }

    Ok(arguments)
}

/// Build `calculate` arguments.
pub fn calculate_arguments(operation: &str, x: f64, y: f64) -> Result<Map<String, Value>> {
    let mut arguments = Map::new();
    arguments.insert("operation".to_string(), Value::String(operation.to_string()));
    arguments.insert("x".to_string(), number(x)?);
    arguments.insert("y".to_string(), number(y)?);
    Ok(arguments)
}

pub fn operation_symbol(operation: &str) -> &str {
    match operation {
        "add" => "+",
        "subtract" => "-",
        "multiply" => "*",
        "divide" => "/",
        other => other,
    }
}

fn parse_limit(text: &str) -> Result<Value> {
    if let Ok(limit) = text.parse::<u64>() {
        return Ok(Value::Number(limit.into()));
    }
    match text.parse::<f64>() {
        Ok(limit) => number(limit),
        Err(_) => bail!("invalid limit '{}': expected a number", text),
    }
}

fn number(value: f64) -> Result<Value> {
    match Number::from_f64(value) {
        Some(number) => Ok(Value::Number(number)),
        None => bail!("{} is not a finite number", value),
    }
}
