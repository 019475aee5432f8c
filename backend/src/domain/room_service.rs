//! Room directory service.
//!
//! Owns occupancy consistency: the `occupant_ids` list on a room and the
//! `assigned_room` pointer on an account always change together through the
//! repository's pair write.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::ApiResult;
use crate::domain::account::{Account, AccountId, DisplayName, Email};
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, RoomRepository, RoomRepositoryError,
};
use crate::domain::room::{Room, RoomNumber, RoomValidationError};

fn map_room_repo_error(error: RoomRepositoryError) -> Error {
    match error {
        RoomRepositoryError::DuplicateRoom => Error::conflict("room number already exists"),
        RoomRepositoryError::Missing => Error::not_found("room not found"),
        RoomRepositoryError::Storage { message } => {
            Error::internal(format!("room store error: {message}"))
        }
    }
}

fn map_account_repo_error(error: AccountRepositoryError) -> Error {
    Error::internal(format!("account store error: {error}"))
}

/// Contact details for a fellow occupant.
#[derive(Debug, Clone, PartialEq)]
pub struct RoommateInfo {
    /// Roommate's display name.
    pub display_name: DisplayName,
    /// Roommate's email address.
    pub email: Email,
    /// Roommate's contact number, when recorded.
    pub phone: Option<String>,
}

impl From<Account> for RoommateInfo {
    fn from(account: Account) -> Self {
        Self {
            display_name: account.display_name,
            email: account.email,
            phone: account.phone,
        }
    }
}

/// A student's own room together with roommate contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupiedRoom {
    /// The room the student occupies.
    pub room: Room,
    /// Other occupants of the same room.
    pub roommates: Vec<RoommateInfo>,
}

/// Service implementing room administration and occupancy queries.
#[derive(Clone)]
pub struct RoomDirectoryService {
    rooms: Arc<dyn RoomRepository>,
    accounts: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
}

impl RoomDirectoryService {
    /// Create the service over its storage capabilities.
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        accounts: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            accounts,
            clock,
        }
    }

    /// Create an empty room (admin only).
    pub async fn create_room(
        &self,
        identity: &Identity,
        room_number: RoomNumber,
        capacity: u32,
    ) -> ApiResult<Room> {
        identity.require_admin()?;
        let room = Room::new(room_number, capacity, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.rooms
            .insert(&room)
            .await
            .map_err(map_room_repo_error)?;
        Ok(room)
    }

    /// List every room. Any authenticated caller may browse the directory.
    pub async fn list_rooms(&self, _identity: &Identity) -> ApiResult<Vec<Room>> {
        self.rooms.list().await.map_err(map_room_repo_error)
    }

    /// Assign a student to a room (admin only).
    ///
    /// The occupant append and the `assigned_room` pointer persist together;
    /// capacity and double-assignment violations surface as `Conflict`.
    pub async fn assign(
        &self,
        identity: &Identity,
        room_number: &RoomNumber,
        student_id: &AccountId,
    ) -> ApiResult<Room> {
        identity.require_admin()?;

        let mut room = self
            .rooms
            .find(room_number)
            .await
            .map_err(map_room_repo_error)?
            .ok_or_else(|| Error::not_found("room not found"))?;
        let mut account = self
            .accounts
            .find_by_id(student_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::not_found("student not found"))?;

        if !account.is_student() {
            return Err(Error::invalid_request(
                "only students can be assigned to rooms",
            ));
        }
        if account.assigned_room.is_some() {
            return Err(Error::conflict("student already has a room assignment"));
        }

        room.add_occupant(account.id).map_err(|err| match err {
            RoomValidationError::AtCapacity => Error::conflict("room is at capacity"),
            RoomValidationError::DuplicateOccupant => {
                Error::conflict("student is already an occupant of this room")
            }
            other => Error::invalid_request(other.to_string()),
        })?;
        account.assigned_room = Some(room.room_number.clone());

        self.rooms
            .persist_assignment(&room, &account)
            .await
            .map_err(map_room_repo_error)?;
        Ok(room)
    }

    /// Remove a student's room assignment.
    ///
    /// Recomputes status to `available` via occupancy; tolerates a stale
    /// `assigned_room` pointer at a room that no longer exists.
    pub async fn unassign(&self, student_id: &AccountId) -> ApiResult<()> {
        let mut account = self
            .accounts
            .find_by_id(student_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::not_found("student not found"))?;

        let Some(room_number) = account.assigned_room.take() else {
            return Ok(());
        };

        match self
            .rooms
            .find(&room_number)
            .await
            .map_err(map_room_repo_error)?
        {
            Some(mut room) => {
                room.remove_occupant(&account.id);
                self.rooms
                    .persist_assignment(&room, &account)
                    .await
                    .map_err(map_room_repo_error)?;
            }
            None => {
                warn!(room_number = %room_number, "assigned room missing, clearing pointer");
                self.accounts
                    .update(&account)
                    .await
                    .map_err(map_account_repo_error)?;
            }
        }
        Ok(())
    }

    /// The room a student is currently assigned to, if any.
    pub async fn current_room(&self, student_id: &AccountId) -> ApiResult<Option<RoomNumber>> {
        let account = self
            .accounts
            .find_by_id(student_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::not_found("student not found"))?;
        Ok(account.assigned_room)
    }

    /// The calling student's room with roommate contact details.
    pub async fn my_room(&self, identity: &Identity) -> ApiResult<Option<OccupiedRoom>> {
        identity.require_student()?;

        let Some(room_number) = self.current_room(&identity.subject_id).await? else {
            return Ok(None);
        };
        let room = self
            .rooms
            .find(&room_number)
            .await
            .map_err(map_room_repo_error)?
            .ok_or_else(|| Error::not_found("room not found"))?;

        let mut roommates = Vec::new();
        for occupant_id in &room.occupant_ids {
            if occupant_id == &identity.subject_id {
                continue;
            }
            match self
                .accounts
                .find_by_id(occupant_id)
                .await
                .map_err(map_account_repo_error)?
            {
                Some(account) => roommates.push(RoommateInfo::from(account)),
                None => {
                    warn!(occupant_id = %occupant_id, "occupant account missing, skipping");
                }
            }
        }
        Ok(Some(OccupiedRoom { room, roommates }))
    }
}
