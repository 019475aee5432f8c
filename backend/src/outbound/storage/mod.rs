//! Blob storage adapters for uploaded attachments.

pub mod fs_blob_store;
pub mod memory_blob_store;

pub use fs_blob_store::FsBlobStore;
pub use memory_blob_store::MemoryBlobStore;
