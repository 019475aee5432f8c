//! Attachment service: validated uploads and owner-scoped downloads.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ApiResult;
use crate::domain::account::AccountId;
use crate::domain::attachment::{AttachmentRecord, normalized_extension, validate_size};
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::ports::{AttachmentBlobStore, BlobStoreError};
use crate::domain::renewal::AttachmentSlot;

fn map_blob_store_error(error: BlobStoreError) -> Error {
    Error::internal(format!("blob store error: {error}"))
}

/// Service implementing upload validation and blob access control.
#[derive(Clone)]
pub struct AttachmentService {
    blobs: Arc<dyn AttachmentBlobStore>,
    clock: Arc<dyn Clock>,
}

impl AttachmentService {
    /// Create the service over the blob store.
    pub fn new(blobs: Arc<dyn AttachmentBlobStore>, clock: Arc<dyn Clock>) -> Self {
        Self { blobs, clock }
    }

    /// Accept an upload from the calling student.
    ///
    /// Validates size and declared extension, then stores the payload under
    /// a server-generated name in the caller's partition. The caller never
    /// influences the stored name beyond its extension.
    pub async fn upload(
        &self,
        identity: &Identity,
        slot: AttachmentSlot,
        declared_name: &str,
        bytes: &[u8],
    ) -> ApiResult<AttachmentRecord> {
        identity.require_student()?;

        validate_size(bytes.len()).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({"size_bytes": bytes.len()}))
        })?;
        let original_extension = normalized_extension(declared_name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let stored_name = format!("{slot}_{}{original_extension}", Uuid::new_v4());
        self.blobs
            .save(&identity.subject_id, &stored_name, bytes)
            .await
            .map_err(map_blob_store_error)?;
        debug!(slot = %slot, stored_name = %stored_name, "attachment stored");

        Ok(AttachmentRecord {
            owner_id: identity.subject_id,
            slot,
            stored_name,
            original_extension,
            size_bytes: bytes.len(),
            uploaded_at: self.clock.utc(),
        })
    }

    /// Fetch a stored blob.
    ///
    /// Students may only read their own partition; admins may read any.
    pub async fn fetch(
        &self,
        identity: &Identity,
        owner_id: &AccountId,
        stored_name: &str,
    ) -> ApiResult<Vec<u8>> {
        if !identity.is_admin() && identity.subject_id != *owner_id {
            return Err(Error::forbidden("attachment belongs to another student"));
        }
        self.blobs
            .load(owner_id, stored_name)
            .await
            .map_err(map_blob_store_error)?
            .ok_or_else(|| Error::not_found("attachment not found"))
    }
}
