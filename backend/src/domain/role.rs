//! Actor roles.
//!
//! The original system compared free-form role strings; here the role is a
//! closed two-variant enumeration and unrecognised values fail fast at the
//! boundary instead of silently falling through authorization checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Resident: owns a room assignment, complaints, and renewal forms.
    Student,
    /// Operator: manages rooms, reviews, payments, and the mess menu.
    Admin,
}

impl Role {
    /// Stable wire representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised role: {value}")]
pub struct UnknownRole {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}
