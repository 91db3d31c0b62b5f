//! Warehouse layer: BigQuery (managed) and DuckDB (local analytical file).

mod error;
mod warehouse;
pub use error::WriteError;
pub use warehouse::Warehouse;

#[cfg(feature = "bigquery")]
mod bigquery;
#[cfg(feature = "bigquery")]
pub use bigquery::BigQueryWriter;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;
