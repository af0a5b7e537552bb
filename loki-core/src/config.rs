use std::env;
use std::time::Duration;

/// Environment variable naming the default Loki endpoint
pub const ENV_LOKI_URL: &str = "LOKI_URL";

/// Endpoint used when `LOKI_URL` is unset or empty
pub const DEFAULT_LOKI_URL: &str = "http://localhost:3100";

/// Result limit applied when a call does not pass one
pub const DEFAULT_LIMIT: u64 = 100;

/// Upper bound on a single upstream query
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Get the default Loki base URL
///
/// Priority:
/// 1. LOKI_URL env var (ignored when empty)
/// 2. http://localhost:3100
///
/// Read once at start-up and carried in the server config; handlers never
/// consult the environment themselves.
pub fn default_loki_url() -> String {
    match env::var(ENV_LOKI_URL) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_LOKI_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test so they never race on the shared variable.
    #[test]
    fn test_loki_url_env_override() {
        std::env::set_var(ENV_LOKI_URL, "http://loki.internal:3100");
        assert_eq!(default_loki_url(), "http://loki.internal:3100");

        std::env::set_var(ENV_LOKI_URL, "");
        assert_eq!(default_loki_url(), DEFAULT_LOKI_URL);

        std::env::remove_var(ENV_LOKI_URL);
        assert_eq!(default_loki_url(), DEFAULT_LOKI_URL);
    }
}
