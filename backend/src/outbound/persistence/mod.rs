//! Document-store persistence adapters.
//!
//! The memory adapters back every repository port with one shared,
//! lock-protected document store, so multi-document writes (room plus
//! account) and uniqueness checks happen in a single critical section.
//! Swapping in an external document database means reimplementing these
//! ports, nothing above them changes.

pub mod memory_account_repository;
pub mod memory_document_store;
pub mod memory_record_store;
pub mod memory_renewal_form_repository;
pub mod memory_room_repository;

pub use memory_account_repository::MemoryAccountRepository;
pub use memory_document_store::MemoryDocumentStore;
pub use memory_record_store::MemoryRecordStore;
pub use memory_renewal_form_repository::MemoryRenewalFormRepository;
pub use memory_room_repository::MemoryRoomRepository;
