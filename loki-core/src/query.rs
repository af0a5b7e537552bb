use chrono::{DateTime, Duration, Utc};
use reqwest::Url;

use crate::error::Result;
use crate::model::Credentials;
use crate::{query_url, time};

/// Typed form of a `loki_query` call, built from the raw tool arguments.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub query: String,
    pub url: String,
    pub credentials: Credentials,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: u64,
}

/// A query with absolute bounds and the final request URL.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    pub query: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub limit: u64,
    pub url: Url,
}

impl QueryRequest {
    /// Resolve time bounds against `now` and assemble the request URL.
    ///
    /// Missing or empty bounds default to the hour before `now`.
    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<ResolvedQuery> {
        let start = match non_empty(&self.start) {
            Some(text) => time::resolve_at(text, now)?,
            None => now - Duration::hours(1),
        };
        let end = match non_empty(&self.end) {
            Some(text) => time::resolve_at(text, now)?,
            None => now,
        };

        let url = query_url::build(
            &self.url,
            &self.query,
            start.timestamp(),
            end.timestamp(),
            self.limit,
        )?;

        Ok(ResolvedQuery {
            query: self.query.clone(),
            start,
            end,
            limit: self.limit,
            url,
        })
    }

    pub fn resolve(&self) -> Result<ResolvedQuery> {
        self.resolve_at(Utc::now())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
