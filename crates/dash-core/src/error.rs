// File: crates/dash-core/src/error.rs
// Summary: Error taxonomy for query-level failures. Row-level defects are never errors.

use thiserror::Error;

/// Failure of one query against a data source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("data source returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid query {query}: {reason}")]
    InvalidQuery { query: String, reason: String },
    #[error("result set exceeds {max_pages} pages of {page_size} rows; narrow the query")]
    TooManyPages { max_pages: usize, page_size: usize },
}

/// Failure of one dashboard load (fetch + cleaning).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no usable rows in {table}")]
    Empty { table: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported range: {0}")]
pub struct ParseRangeError(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported display mode: {0}")]
pub struct ParseModeError(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("data source url is not configured")]
    MissingUrl,
    #[error("data source key is not configured")]
    MissingKey,
    #[error("invalid data source url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
