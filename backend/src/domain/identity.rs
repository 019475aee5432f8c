//! Resolved caller identity.
//!
//! The transport layer resolves an opaque credential into this pair; every
//! service consumes it and none mutates it.

use crate::domain::account::AccountId;
use crate::domain::error::Error;
use crate::domain::role::Role;

/// Authenticated caller: subject plus role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The authenticated account.
    pub subject_id: AccountId,
    /// The account's role, validated at the boundary.
    pub role: Role,
}

impl Identity {
    /// Construct an identity.
    pub const fn new(subject_id: AccountId, role: Role) -> Self {
        Self { subject_id, role }
    }

    /// Whether the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require the admin role, failing `Forbidden` otherwise.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }

    /// Require the student role, failing `Forbidden` otherwise.
    pub fn require_student(&self) -> Result<(), Error> {
        if self.role == Role::Student {
            Ok(())
        } else {
            Err(Error::forbidden("student role required"))
        }
    }
}
