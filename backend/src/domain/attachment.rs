//! Uploaded-document records and upload policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::account::AccountId;
use crate::domain::renewal::AttachmentSlot;

/// Maximum accepted upload size in bytes (5 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 5_242_880;

/// Recognised file extensions, lower-case with leading dot.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".pdf"];

/// Policy violations raised by upload validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentPolicyError {
    /// Payload exceeded [`MAX_ATTACHMENT_BYTES`].
    #[error("file exceeds the {limit} byte limit")]
    TooLarge {
        /// The enforced byte limit.
        limit: usize,
    },
    /// Declared name carried no extension or an unrecognised one.
    #[error("file extension must be one of .jpg, .jpeg, .png, .pdf")]
    BadExtension,
}

/// Validate the payload size against the policy limit.
pub fn validate_size(size_bytes: usize) -> Result<(), AttachmentPolicyError> {
    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentPolicyError::TooLarge {
            limit: MAX_ATTACHMENT_BYTES,
        });
    }
    Ok(())
}

/// Extract and normalise the extension of a declared file name.
///
/// Matching is case-insensitive; the returned extension is lower-case with
/// its leading dot.
pub fn normalized_extension(declared_name: &str) -> Result<String, AttachmentPolicyError> {
    let dot = declared_name
        .rfind('.')
        .ok_or(AttachmentPolicyError::BadExtension)?;
    let extension = declared_name
        .get(dot..)
        .ok_or(AttachmentPolicyError::BadExtension)?
        .to_lowercase();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AttachmentPolicyError::BadExtension)
    }
}

/// Stored-document record.
///
/// Owned exclusively by the uploading student's storage partition and
/// referenced (not owned) by `RenewalForm.attachments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttachmentRecord {
    /// Uploading student.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub owner_id: AccountId,
    /// Document category.
    pub slot: AttachmentSlot,
    /// Server-generated, collision-free name within the owner's partition.
    pub stored_name: String,
    /// Lower-cased extension of the declared name, with leading dot.
    pub original_extension: String,
    /// Payload size in bytes, at most [`MAX_ATTACHMENT_BYTES`].
    pub size_bytes: usize,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}
