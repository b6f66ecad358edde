//! In-memory store for exercising handlers without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::{AttendanceRecord, AttendanceStats, RecordFilter};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, AttendanceRecord>>,
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert(&self, record: &AttendanceRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut found: Vec<AttendanceRecord> = self
            .records
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.records.write().remove(id))
    }

    async fn stats(&self) -> Result<AttendanceStats, StoreError> {
        Ok(AttendanceStats::from_records(self.records.read().values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[actix_web::test]
    async fn memory_store_honours_store_contract() {
        contract::check_store_contract(&MemoryStore::default()).await;
    }
}
