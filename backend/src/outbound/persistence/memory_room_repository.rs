//! Memory-backed room repository.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::ports::{RoomRepository, RoomRepositoryError};
use crate::domain::room::{Room, RoomNumber};

use super::memory_document_store::MemoryDocumentStore;

/// [`RoomRepository`] over the shared memory store.
#[derive(Debug, Clone)]
pub struct MemoryRoomRepository {
    store: MemoryDocumentStore,
}

impl MemoryRoomRepository {
    pub(super) fn new(store: MemoryDocumentStore) -> Self {
        Self { store }
    }
}

fn poisoned() -> RoomRepositoryError {
    RoomRepositoryError::storage("document store lock poisoned")
}

#[async_trait]
impl RoomRepository for MemoryRoomRepository {
    async fn insert(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if state.rooms.contains_key(&room.room_number) {
            return Err(RoomRepositoryError::DuplicateRoom);
        }
        state.rooms.insert(room.room_number.clone(), room.clone());
        Ok(())
    }

    async fn find(&self, room_number: &RoomNumber) -> Result<Option<Room>, RoomRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        Ok(state.rooms.get(room_number).cloned())
    }

    async fn list(&self) -> Result<Vec<Room>, RoomRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        Ok(state.rooms.values().cloned().collect())
    }

    async fn update(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if !state.rooms.contains_key(&room.room_number) {
            return Err(RoomRepositoryError::Missing);
        }
        state.rooms.insert(room.room_number.clone(), room.clone());
        Ok(())
    }

    async fn persist_assignment(
        &self,
        room: &Room,
        account: &Account,
    ) -> Result<(), RoomRepositoryError> {
        // One write guard covers both collections, so readers never see the
        // occupant list and the assigned_room pointer disagree.
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if !state.rooms.contains_key(&room.room_number) {
            return Err(RoomRepositoryError::Missing);
        }
        if !state.accounts.contains_key(&account.id) {
            return Err(RoomRepositoryError::Missing);
        }
        state.rooms.insert(room.room_number.clone(), room.clone());
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }
}
