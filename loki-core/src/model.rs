use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Credentials attached to the outbound query.
///
/// A bearer token always wins over username/password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl Credentials {
    /// Pick the credentials to send from the optional call arguments.
    ///
    /// Empty strings count as absent. Basic auth is used when either half is
    /// present; the missing half is sent as an empty string.
    pub fn from_parts(
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
    ) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        if let Some(token) = non_empty(token) {
            return Credentials::Bearer(token);
        }

        match (non_empty(username), non_empty(password)) {
            (None, None) => Credentials::None,
            (username, password) => Credentials::Basic {
                username: username.unwrap_or_default(),
                password: password.unwrap_or_default(),
            },
        }
    }
}

/// Envelope returned by `/loki/api/v1/query_range`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub status: String,
    #[serde(default)]
    pub data: QueryData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryData {
    #[serde(rename = "resultType", default)]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<LogStream>,
}

/// Log lines sharing one label set.
///
/// Each value row is `[timestamp, line]` with the timestamp in nanoseconds
/// since the epoch, kept in upstream order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogStream {
    #[serde(rename = "stream", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }

    pub fn streams(&self) -> &[LogStream] {
        &self.data.result
    }
}
