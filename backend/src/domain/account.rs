//! Account identity and its validated components.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::role::Role;
use crate::domain::room::RoomNumber;

/// Validation errors raised by account component constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier was empty or not a valid UUID.
    #[error("account id must be a valid UUID")]
    InvalidId,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked a usable `local@domain` shape.
    #[error("email must contain a local part and a domain")]
    MalformedEmail,
    /// Display name was blank once trimmed.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeded the maximum length.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Stable account identifier stored as a UUID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }
}

impl From<Uuid> for AccountId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Unique, normalised email address.
///
/// ## Invariants
/// - Trimmed and lowercased on construction.
/// - Contains exactly one `@` with non-empty local part and domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        let mut parts = normalised.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(AccountValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(AccountValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application account.
///
/// ## Invariants
/// - `email` is unique across the store (enforced by the repository).
/// - `assigned_room`, when set, appears in exactly one room's occupant list;
///   it is mutated only by room-assignment operations.
/// - `credential_hash` never leaves the domain; HTTP views strip it.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Stable identifier.
    pub id: AccountId,
    /// Unique login email.
    pub email: Email,
    /// Hashed credential in PHC string format.
    pub credential_hash: String,
    /// Name shown to other users.
    pub display_name: DisplayName,
    /// Actor role.
    pub role: Role,
    /// Current room assignment, if any.
    pub assigned_room: Option<RoomNumber>,
    /// Optional contact number.
    pub phone: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account may own rooms, complaints, and renewal forms.
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Ada@Example.COM", "ada@example.com")]
    #[case("  s1@hostel.edu  ", "s1@hostel.edu")]
    fn emails_are_normalised(#[case] input: &str, #[case] expected: &str) {
        let email = Email::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_emails_are_rejected(#[case] input: &str) {
        assert_eq!(
            Email::new(input).expect_err("blank email"),
            AccountValidationError::EmptyEmail
        );
    }

    #[rstest]
    #[case("no-at-sign")]
    #[case("@domain")]
    #[case("local@")]
    #[case("a@b@c")]
    fn malformed_emails_are_rejected(#[case] input: &str) {
        assert_eq!(
            Email::new(input).expect_err("malformed email"),
            AccountValidationError::MalformedEmail
        );
    }

    #[rstest]
    fn display_name_is_trimmed() {
        let name = DisplayName::new("  Priya Sharma  ").expect("valid name");
        assert_eq!(name.as_ref(), "Priya Sharma");
    }

    #[rstest]
    fn overlong_display_name_is_rejected() {
        let raw = "x".repeat(DISPLAY_NAME_MAX + 1);
        let err = DisplayName::new(raw).expect_err("overlong name");
        assert_eq!(
            err,
            AccountValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            }
        );
    }

    #[rstest]
    fn account_id_parses_only_uuids() {
        assert!("not-a-uuid".parse::<AccountId>().is_err());
        let id = AccountId::random();
        let round = id.to_string().parse::<AccountId>().expect("uuid round trip");
        assert_eq!(round, id);
    }
}
