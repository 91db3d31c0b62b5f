use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[cfg(feature = "bigquery")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("insert rejected: {0}")]
    Rejected(String),

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[cfg(feature = "duckdb")]
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no results for query")]
    NoResults,

    #[error("{0}")]
    Other(String),
}
