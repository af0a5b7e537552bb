use thiserror::Error;

/// Failures raised while resolving, building, executing or decoding a Loki query.
#[derive(Error, Debug)]
pub enum LokiError {
    #[error("unsupported time format: {0}")]
    InvalidTimeExpression(String),
    #[error("invalid Loki URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to Loki failed: {0}")]
    Network(String),
    #[error("HTTP error: {status} - {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Loki error: {0}")]
    Upstream(String),
    #[error("failed to decode Loki response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("query cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for LokiError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL so credentials embedded in it never reach the message
        LokiError::Network(err.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, LokiError>;
