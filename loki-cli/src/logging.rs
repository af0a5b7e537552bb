use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_DIRECTIVES: &str =
    "loki_core=info,loki_mcp=info,loki_cli=info,loki_client=info,loki_mcp_server=info";

/// Install the fmt subscriber on stderr.
pub fn init() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// `RUST_LOG` wins when set; otherwise the loki crates log at `info`.
pub fn filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    /// (core debug, core info, mcp debug) under the filter built from `rust_log`
    fn levels(rust_log: Option<&str>) -> (bool, bool, bool) {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter(rust_log))
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            (
                tracing::enabled!(target: "loki_core::client", Level::DEBUG),
                tracing::enabled!(target: "loki_core::client", Level::INFO),
                tracing::enabled!(target: "loki_mcp::tools::loki", Level::DEBUG),
            )
        })
    }

    // One test so the scoped subscribers never overlap
    #[test]
    fn test_rust_log_overrides_defaults() {
        assert_eq!(levels(Some("loki_core=debug,loki_mcp=debug")), (true, true, true));
        assert_eq!(levels(None), (false, true, false));
        assert_eq!(levels(Some("")), (false, true, false));
        assert_eq!(levels(Some("loki_core=warn")), (false, false, false));
    }
}
