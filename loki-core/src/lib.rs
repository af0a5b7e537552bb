//! Loki query pipeline: time expressions, query URLs, HTTP execution and
//! plain-text report formatting.

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod query;
pub mod query_url;
pub mod time;

pub use client::{HttpQueryExecutor, QueryExecutor};
pub use error::{LokiError, Result};
pub use model::{Credentials, LogStream, QueryData, QueryResult};
pub use query::{QueryRequest, ResolvedQuery};
pub use reqwest::Url;
