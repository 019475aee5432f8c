//! Memory-backed generic record store.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::records::Record;

/// [`RecordStore`] keeping records in insertion order.
///
/// Each record kind gets its own instance; there is no cross-kind state to
/// share, so this adapter carries its own lock.
#[derive(Debug, Default)]
pub struct MemoryRecordStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryRecordStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

fn poisoned() -> RecordStoreError {
    RecordStoreError::storage("record store lock poisoned")
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryRecordStore<T> {
    async fn insert(&self, record: &T) -> Result<(), RecordStoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.push(record.clone());
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>, RecordStoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .iter()
            .find(|record| record.record_id() == *id)
            .cloned())
    }

    async fn update(&self, record: &T) -> Result<(), RecordStoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.record_id() == record.record_id())
            .ok_or(RecordStoreError::Missing)?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, RecordStoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let before = records.len();
        records.retain(|record| record.record_id() != *id);
        Ok(records.len() != before)
    }

    async fn list(&self) -> Result<Vec<T>, RecordStoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.clone())
    }
}
