//! Port for attachment blob storage.
//!
//! Blobs live in per-owner partitions; callers never hand the adapter a
//! path, only an owner id and a server-generated stored name.

use async_trait::async_trait;

use crate::domain::account::AccountId;

/// Errors raised by blob store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobStoreError {
    /// The underlying storage failed.
    #[error("blob store failed: {message}")]
    Io {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl BlobStoreError {
    /// Build a [`BlobStoreError::Io`] from any message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Port for writing, reading, and removing attachment blobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentBlobStore: Send + Sync {
    /// Persist a blob under the owner's partition.
    async fn save(
        &self,
        owner: &AccountId,
        stored_name: &str,
        bytes: &[u8],
    ) -> Result<(), BlobStoreError>;

    /// Load a blob; `None` when it does not exist.
    async fn load(
        &self,
        owner: &AccountId,
        stored_name: &str,
    ) -> Result<Option<Vec<u8>>, BlobStoreError>;

    /// Remove a blob; returns whether it existed.
    async fn remove(&self, owner: &AccountId, stored_name: &str) -> Result<bool, BlobStoreError>;
}
