use loki_core::LokiError;
use rmcp::{model::ErrorCode, Error as RmcpError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("missing required argument: {0}")]
    MissingArgument(String),
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },
    #[error(transparent)]
    Loki(#[from] LokiError),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ToolError> for RmcpError {
    fn from(err: ToolError) -> Self {
        let code = match &err {
            ToolError::MissingArgument(_)
            | ToolError::InvalidArgument { .. }
            | ToolError::UnknownTool(_) => ErrorCode::INVALID_PARAMS,
            ToolError::Loki(_)
            | ToolError::DivisionByZero
            | ToolError::UnsupportedOperation(_) => ErrorCode::INTERNAL_ERROR,
        };
        RmcpError::new(code, err.to_string(), None)
    }
}
