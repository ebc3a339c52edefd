use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while fetching, decoding or shaping archive data.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The query failed local validation before any request was made.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Connection, timeout or body read failure inside the HTTP client.
    #[error("HTTP request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The archive API answered with a non-success status.
    #[error("Archive API request failed with status {status}: {reason}")]
    Status { status: u16, reason: String },

    /// A transient failure persisted through every retry.
    #[error("Archive API request failed after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<ArchiveError>,
    },

    #[error("Failed to decode archive response")]
    Decode(#[from] serde_json::Error),

    #[error("Response contains no {cadence} block although {requested} variables were requested")]
    MissingBlock {
        cadence: &'static str,
        requested: usize,
    },

    #[error("Response {cadence} block has no series for requested variable '{variable}'")]
    MissingVariable {
        cadence: &'static str,
        variable: &'static str,
    },

    #[error("Block carries {found} variables but {expected} names were supplied")]
    VariableCountMismatch { expected: usize, found: usize },

    #[error("Variable at position {position} is '{found}' but '{expected}' was expected")]
    VariableOrderMismatch {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Series '{variable}' has {found} values but the time range implies {expected}")]
    SeriesLengthMismatch {
        variable: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Block interval must be positive, got {0} s")]
    InvalidInterval(i64),

    #[error("Timestamp {0} is outside the representable range")]
    InvalidTimestamp(i64),

    #[error("Failed to build table frame")]
    Frame(#[from] polars::prelude::PolarsError),

    #[error("Cache I/O failed for {path}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode cache entry for {path}")]
    CacheEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ArchiveError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ArchiveError::Request { source, .. } => {
                source.is_connect() || source.is_timeout() || source.is_request() || source.is_body()
            }
            ArchiveError::Status { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}
