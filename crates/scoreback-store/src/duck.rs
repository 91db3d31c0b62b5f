//! DuckDB warehouse for local backfills and inspection.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use duckdb::{Connection, params};
use scoreback_core::PersistedRow;
use tracing::info;

use crate::{Warehouse, WriteError};

/// DuckDB-backed scorecard table.
///
/// One row per (commit, fetch) with the same shape as the BigQuery table:
/// `repo` and `scorecard` flattened into prefixed columns, and `checks`
/// kept as a JSON array in a text column.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Use [`open`](Self::open) for in-memory and [`open_persistent`](Self::open_persistent)
/// for a file that accumulates rows across runs.
pub struct DuckStore {
    conn: Connection,
    table: String,
}

impl DuckStore {
    /// Open an in-memory DuckDB database with `table` created.
    pub fn open(table: &str) -> Result<Self, WriteError> {
        Self::init(Connection::open_in_memory()?, table)
    }

    /// Open or create a persistent DuckDB database at the given path.
    ///
    /// Existing rows in `table` are kept; new rows are appended.
    pub fn open_persistent(path: &Path, table: &str) -> Result<Self, WriteError> {
        Self::init(Connection::open(path)?, table)
    }

    fn init(conn: Connection, table: &str) -> Result<Self, WriteError> {
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(WriteError::Other(format!("invalid table name: {table:?}")));
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                date TIMESTAMP NOT NULL,
                repo_name VARCHAR NOT NULL,
                repo_commit VARCHAR NOT NULL,
                scorecard_version VARCHAR,
                scorecard_commit VARCHAR,
                score DOUBLE,
                checks VARCHAR
            )"
        );
        conn.execute_batch(&sql)?;
        info!(table, "duckdb table ready");
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Append one row.
    pub fn insert(&self, row: &PersistedRow) -> Result<(), WriteError> {
        let checks = serde_json::to_string(&row.checks)?;
        let date = row.date.format("%Y-%m-%d %H:%M:%S").to_string();
        let sql = format!(
            "INSERT INTO {} VALUES (CAST(? AS TIMESTAMP), ?, ?, ?, ?, ?, ?)",
            self.table
        );
        self.conn.execute(
            &sql,
            params![
                date,
                row.repo.name,
                row.repo.commit,
                row.scorecard.version,
                row.scorecard.commit,
                row.score,
                checks
            ],
        )?;
        Ok(())
    }

    /// Number of rows in the scorecard table.
    pub fn row_count(&self) -> Result<usize, WriteError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {}", self.table);
        let batches = self.query_arrow(&sql)?;
        let batch = batches.first().ok_or(WriteError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<arrow::array::Int64Array>()
            .ok_or_else(|| WriteError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, WriteError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl Warehouse for DuckStore {
    async fn insert_row(&mut self, row: &PersistedRow) -> Result<(), WriteError> {
        self.insert(row)?;
        info!(table = %self.table, commit = %row.repo.commit, "row inserted");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("duckdb:{}", self.table)
    }
}
