//! Room entity and occupancy invariants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::account::AccountId;

/// Validation errors raised by room constructors and mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomValidationError {
    /// Room number was blank once trimmed.
    #[error("room number must not be empty")]
    EmptyRoomNumber,
    /// Room number exceeded the maximum length.
    #[error("room number must be at most {max} characters")]
    RoomNumberTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Capacity below the minimum of one.
    #[error("room capacity must be at least 1")]
    ZeroCapacity,
    /// The room already holds `capacity` occupants.
    #[error("room is at capacity")]
    AtCapacity,
    /// The student is already listed as an occupant.
    #[error("student is already an occupant")]
    DuplicateOccupant,
}

/// Maximum allowed length for a room number.
pub const ROOM_NUMBER_MAX: usize = 16;

/// Unique room key such as `A101`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "A101")]
pub struct RoomNumber(String);

impl RoomNumber {
    /// Validate and construct a [`RoomNumber`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RoomValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RoomValidationError::EmptyRoomNumber);
        }
        if trimmed.chars().count() > ROOM_NUMBER_MAX {
            return Err(RoomValidationError::RoomNumberTooLong {
                max: ROOM_NUMBER_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RoomNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RoomNumber> for String {
    fn from(value: RoomNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for RoomNumber {
    type Error = RoomValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for RoomNumber {
    type Err = RoomValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Derived occupancy status.
///
/// `Maintenance` is reserved: declared in the data model but never set by any
/// operation. Unassignment recomputes to `Available` unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// At least one bed free.
    Available,
    /// Occupant count equals capacity.
    Full,
    /// Reserved; no operation currently sets this.
    Maintenance,
}

/// Hostel room.
///
/// ## Invariants
/// - `occupant_ids` entries are unique and `len(occupant_ids) <= capacity`.
/// - `capacity >= 1`.
/// - Status is derived: `Full` iff the room is at capacity, else `Available`.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Unique room key.
    pub room_number: RoomNumber,
    /// Number of beds, at least one.
    pub capacity: u32,
    /// Ordered occupant identifiers, unique, at most `capacity` entries.
    pub occupant_ids: Vec<AccountId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Construct an empty room.
    pub fn new(
        room_number: RoomNumber,
        capacity: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RoomValidationError> {
        if capacity == 0 {
            return Err(RoomValidationError::ZeroCapacity);
        }
        Ok(Self {
            room_number,
            capacity,
            occupant_ids: Vec::new(),
            created_at,
        })
    }

    /// Current occupant count.
    pub fn occupant_count(&self) -> usize {
        self.occupant_ids.len()
    }

    /// Derived status from occupancy.
    pub fn status(&self) -> RoomStatus {
        if self.occupant_count() >= self.capacity as usize {
            RoomStatus::Full
        } else {
            RoomStatus::Available
        }
    }

    /// Append an occupant, enforcing capacity and uniqueness.
    pub fn add_occupant(&mut self, student_id: AccountId) -> Result<(), RoomValidationError> {
        if self.occupant_ids.contains(&student_id) {
            return Err(RoomValidationError::DuplicateOccupant);
        }
        if self.occupant_count() >= self.capacity as usize {
            return Err(RoomValidationError::AtCapacity);
        }
        self.occupant_ids.push(student_id);
        Ok(())
    }

    /// Remove an occupant; returns whether the student was present.
    pub fn remove_occupant(&mut self, student_id: &AccountId) -> bool {
        let before = self.occupant_ids.len();
        self.occupant_ids.retain(|id| id != student_id);
        self.occupant_ids.len() != before
    }
}
