//! Port for room document persistence.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::room::{Room, RoomNumber};

/// Errors raised by room repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomRepositoryError {
    /// A room with the same number already exists.
    #[error("a room with this number already exists")]
    DuplicateRoom,
    /// The targeted room document does not exist.
    #[error("room does not exist")]
    Missing,
    /// The store failed during the operation.
    #[error("room store failed: {message}")]
    Storage {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl RoomRepositoryError {
    /// Build a [`RoomRepositoryError::Storage`] from any message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for reading and writing room documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a new room; fails on a duplicate room number.
    async fn insert(&self, room: &Room) -> Result<(), RoomRepositoryError>;

    /// Find a room by number.
    async fn find(&self, room_number: &RoomNumber) -> Result<Option<Room>, RoomRepositoryError>;

    /// List all rooms.
    async fn list(&self) -> Result<Vec<Room>, RoomRepositoryError>;

    /// Overwrite an existing room document.
    async fn update(&self, room: &Room) -> Result<(), RoomRepositoryError>;

    /// Persist a room/account pair in one critical section keyed by the
    /// room, so a reader never observes one updated without the other.
    /// Used by both assignment and unassignment.
    async fn persist_assignment(
        &self,
        room: &Room,
        account: &Account,
    ) -> Result<(), RoomRepositoryError>;
}
