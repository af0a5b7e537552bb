// Builds query_range URLs from a user-supplied Loki base URL

use reqwest::Url;

use crate::error::{LokiError, Result};

const API_SEGMENT: &str = "loki/api/v1";
const QUERY_RANGE: &str = "query_range";
const OWNED_PARAMS: [&str; 4] = ["query", "start", "end", "limit"];

/// Build the `query_range` URL for a query.
///
/// The base may be a bare host (`http://loki:3100`), a prefixed deployment
/// (`http://gateway/logs`) or already point at the API. `start` and `end` are
/// Unix epoch seconds. Parameters are emitted in key order so identical
/// inputs always give identical URLs.
pub fn build(base: &str, query: &str, start: i64, end: i64, limit: u64) -> Result<Url> {
    let invalid = |reason: &str| LokiError::InvalidBaseUrl {
        url: base.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(base).map_err(|e| invalid(&e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http or https URL"));
    }

    let path = normalize_path(url.path());
    url.set_path(&path);

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !OWNED_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    params.push(("query".to_string(), query.to_string()));
    params.push(("start".to_string(), start.to_string()));
    params.push(("end".to_string(), end.to_string()));
    params.push(("limit".to_string(), limit.to_string()));
    params.sort_by(|a, b| a.0.cmp(&b.0));

    url.set_query(None);
    url.query_pairs_mut().extend_pairs(params);

    Ok(url)
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');

    if !path.contains(API_SEGMENT) {
        format!("{}/{}/{}", trimmed, API_SEGMENT, QUERY_RANGE)
    } else if !trimmed.ends_with(QUERY_RANGE) {
        format!("{}/{}", trimmed, QUERY_RANGE)
    } else {
        trimmed.to_string()
    }
}
