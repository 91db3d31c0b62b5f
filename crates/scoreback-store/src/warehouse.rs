use async_trait::async_trait;
use scoreback_core::PersistedRow;

use crate::WriteError;

/// Destination for persisted rows. One call appends one row.
#[async_trait]
pub trait Warehouse: Send {
    async fn insert_row(&mut self, row: &PersistedRow) -> Result<(), WriteError>;

    /// Human-readable destination, for logs.
    fn describe(&self) -> String;
}
