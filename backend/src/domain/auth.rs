//! Authentication payload primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use zeroize::Zeroizing;

use crate::domain::account::{AccountValidationError, DisplayName, Email};
use crate::domain::role::Role;

/// Errors raised when login or registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Email or display name failed validation.
    #[error(transparent)]
    Account(#[from] AccountValidationError),
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised per [`Email`].
/// - `password` is non-empty and retains caller-provided whitespace to avoid
///   surprising credential comparisons; zeroed on drop.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email for account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    credentials: LoginCredentials,
    display_name: DisplayName,
    role: Role,
    phone: Option<String>,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
        phone: Option<String>,
    ) -> Result<Self, LoginValidationError> {
        Ok(Self {
            credentials: LoginCredentials::try_from_parts(email, password)?,
            display_name: DisplayName::new(display_name)?,
            role,
            phone: phone.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Login credentials embedded in the registration.
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Validated display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Requested role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Optional contact number, blank values already dropped.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}
