//! In-memory blob store for tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::ports::{AttachmentBlobStore, BlobStoreError};

/// [`AttachmentBlobStore`] keeping blobs in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<(AccountId, String), Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> BlobStoreError {
    BlobStoreError::io("blob store lock poisoned")
}

#[async_trait]
impl AttachmentBlobStore for MemoryBlobStore {
    async fn save(
        &self,
        owner: &AccountId,
        stored_name: &str,
        bytes: &[u8],
    ) -> Result<(), BlobStoreError> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.insert((*owner, stored_name.to_owned()), bytes.to_vec());
        Ok(())
    }

    async fn load(
        &self,
        owner: &AccountId,
        stored_name: &str,
    ) -> Result<Option<Vec<u8>>, BlobStoreError> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(&(*owner, stored_name.to_owned())).cloned())
    }

    async fn remove(&self, owner: &AccountId, stored_name: &str) -> Result<bool, BlobStoreError> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        Ok(blobs.remove(&(*owner, stored_name.to_owned())).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[tokio::test]
    async fn round_trip_matches_the_filesystem_adapter() {
        let store = MemoryBlobStore::new();
        let owner = AccountId::random();

        store
            .save(&owner, "result_1.pdf", b"marks")
            .await
            .expect("save");
        assert_eq!(
            store
                .load(&owner, "result_1.pdf")
                .await
                .expect("load")
                .as_deref(),
            Some(b"marks".as_slice())
        );
        assert!(store
            .load(&AccountId::random(), "result_1.pdf")
            .await
            .expect("load")
            .is_none());
        assert!(store.remove(&owner, "result_1.pdf").await.expect("remove"));
        assert!(!store
            .remove(&owner, "result_1.pdf")
            .await
            .expect("second remove"));
    }
}
