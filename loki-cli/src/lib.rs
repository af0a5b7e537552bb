//! Glue shared by the `loki-client` and `loki-mcp-server` binaries.

pub mod args;
pub mod logging;
pub mod session;

pub use session::{call_once, default_server_path, SERVER_BINARY};
