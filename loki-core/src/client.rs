use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{LokiError, Result};
use crate::model::{Credentials, QueryResult};

/// Runs a prepared query against a Loki-compatible endpoint.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        url: &Url,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<QueryResult>;
}

/// HTTP executor backed by reqwest. No retries.
#[derive(Debug, Clone)]
pub struct HttpQueryExecutor {
    client: Client,
}

impl HttpQueryExecutor {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn send(&self, url: &Url, credentials: &Credentials) -> Result<QueryResult> {
        let mut request = self.client.get(url.clone());
        request = match credentials {
            Credentials::None => request,
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LokiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let result: QueryResult = serde_json::from_str(&body)?;
        if result.is_error() {
            return Err(LokiError::Upstream(result.error.unwrap_or_default()));
        }

        Ok(result)
    }
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn execute(
        &self,
        url: &Url,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<QueryResult> {
        debug!(
            "Querying Loki at {}{}",
            redacted(url),
            match credentials {
                Credentials::None => "",
                Credentials::Bearer(_) => " (bearer token)",
                Credentials::Basic { .. } => " (basic auth)",
            }
        );

        tokio::select! {
            result = self.send(url, credentials) => result,
            _ = cancel.cancelled() => Err(LokiError::Cancelled),
        }
    }
}

/// URL with any userinfo removed, for logging
fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url
}
