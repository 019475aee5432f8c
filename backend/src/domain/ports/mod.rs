//! Capability ports consumed by domain services.
//!
//! Every external capability — the document store collections, blob storage,
//! and password hashing — is a trait here, so services can be exercised with
//! in-memory fakes or mocks and the production adapters stay swappable.

pub mod account_repository;
pub mod attachment_blob_store;
pub mod password_hasher;
pub mod record_store;
pub mod renewal_form_repository;
pub mod room_repository;

pub use account_repository::{AccountRepository, AccountRepositoryError};
pub use attachment_blob_store::{AttachmentBlobStore, BlobStoreError};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use record_store::{RecordStore, RecordStoreError};
pub use renewal_form_repository::{RenewalFormRepository, RenewalFormRepositoryError};
pub use room_repository::{RoomRepository, RoomRepositoryError};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use attachment_blob_store::MockAttachmentBlobStore;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use renewal_form_repository::MockRenewalFormRepository;
#[cfg(test)]
pub use room_repository::MockRoomRepository;
