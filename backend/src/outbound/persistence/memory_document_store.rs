//! Shared state behind the memory repository adapters.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::account::{Account, AccountId};
use crate::domain::renewal::{FormId, RenewalForm};
use crate::domain::room::{Room, RoomNumber};

use super::memory_account_repository::MemoryAccountRepository;
use super::memory_renewal_form_repository::MemoryRenewalFormRepository;
use super::memory_room_repository::MemoryRoomRepository;

/// All document collections under one lock.
#[derive(Debug, Default)]
pub(super) struct Collections {
    pub(super) accounts: HashMap<AccountId, Account>,
    pub(super) rooms: BTreeMap<RoomNumber, Room>,
    pub(super) forms: HashMap<FormId, RenewalForm>,
}

/// In-memory document store shared by the repository adapters.
///
/// One `RwLock` guards every collection: a write guard is a critical
/// section across collections, which is what the room/account pair write
/// and the pending-unique form insert rely on.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<RwLock<Collections>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account repository handle over this store.
    pub fn account_repository(&self) -> MemoryAccountRepository {
        MemoryAccountRepository::new(self.clone())
    }

    /// Room repository handle over this store.
    pub fn room_repository(&self) -> MemoryRoomRepository {
        MemoryRoomRepository::new(self.clone())
    }

    /// Renewal-form repository handle over this store.
    pub fn renewal_form_repository(&self) -> MemoryRenewalFormRepository {
        MemoryRenewalFormRepository::new(self.clone())
    }

    /// Shared read access; `None` when the lock is poisoned.
    pub(super) fn read(&self) -> Option<RwLockReadGuard<'_, Collections>> {
        self.state.read().ok()
    }

    /// Exclusive write access; `None` when the lock is poisoned.
    pub(super) fn write(&self) -> Option<RwLockWriteGuard<'_, Collections>> {
        self.state.write().ok()
    }
}
