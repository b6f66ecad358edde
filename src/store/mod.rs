//! Persistence backends for attendance records.

use async_trait::async_trait;
use derive_more::Display;

use crate::model::attendance::{AttendanceRecord, AttendanceStats, RecordFilter};

#[cfg(test)]
pub mod contract;
#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "{}", _0)]
    Database(sqlx::Error),

    /// A stored row could not be turned back into a record.
    #[display(fmt = "corrupt record: {}", _0)]
    Corrupt(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::Corrupt(format!("column {index}: {source}"))
            }
            other => StoreError::Database(other),
        }
    }
}

/// The attendance collection.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn insert(&self, record: &AttendanceRecord) -> Result<(), StoreError>;

    /// Matching records, newest first.
    async fn list(&self, filter: &RecordFilter) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Removes the record and hands it back, `None` if there was nothing to remove.
    async fn delete(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError>;

    async fn stats(&self) -> Result<AttendanceStats, StoreError>;
}
