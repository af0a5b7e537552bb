use rmcp::model::JsonObject;
use serde_json::Value;

use crate::error::ToolError;

/// Four-function arithmetic on `x` and `y`.
pub fn calculate(arguments: &JsonObject) -> Result<String, ToolError> {
    let operation = arguments
        .get("operation")
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MissingArgument("operation".to_string()))?;
    let x = number_arg(arguments, "x")?;
    let y = number_arg(arguments, "y")?;

    let result = match operation {
        "add" => x + y,
        "subtract" => x - y,
        "multiply" => x * y,
        "divide" => {
            if y == 0.0 {
                return Err(ToolError::DivisionByZero);
            }
            x / y
        }
        other => return Err(ToolError::UnsupportedOperation(other.to_string())),
    };

    Ok(result.to_string())
}

fn number_arg(arguments: &JsonObject, name: &str) -> Result<f64, ToolError> {
    arguments
        .get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
}
