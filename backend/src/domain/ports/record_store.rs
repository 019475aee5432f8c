//! Generic port for simple record collections.
//!
//! Complaints, payments, and mess-menu entries share this capability: each
//! kind gets its own store instance, and services layer the role checks on
//! top.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::records::Record;

/// Errors raised by record store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordStoreError {
    /// The targeted record does not exist.
    #[error("record does not exist")]
    Missing,
    /// The store failed during the operation.
    #[error("record store failed: {message}")]
    Storage {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl RecordStoreError {
    /// Build a [`RecordStoreError::Storage`] from any message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for one collection of records of kind `T`.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: &T) -> Result<(), RecordStoreError>;

    /// Find a record by id.
    async fn get(&self, id: &Uuid) -> Result<Option<T>, RecordStoreError>;

    /// Overwrite an existing record.
    async fn update(&self, record: &T) -> Result<(), RecordStoreError>;

    /// Delete a record; returns whether it existed.
    async fn delete(&self, id: &Uuid) -> Result<bool, RecordStoreError>;

    /// List every record in the collection.
    async fn list(&self) -> Result<Vec<T>, RecordStoreError>;
}
