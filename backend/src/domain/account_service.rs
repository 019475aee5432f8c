//! Account service: registration, authentication, and student admin.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ApiResult;
use crate::domain::account::{Account, AccountId};
use crate::domain::auth::{LoginCredentials, RegistrationDetails};
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, PasswordHasher, PasswordHasherError,
};
use crate::domain::role::Role;
use crate::domain::room_service::RoomDirectoryService;

fn map_account_repo_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::DuplicateEmail => {
            Error::conflict("email address is already registered")
        }
        AccountRepositoryError::Missing => Error::not_found("account not found"),
        AccountRepositoryError::Storage { message } => {
            Error::internal(format!("account store error: {message}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("credential hashing error: {error}"))
}

/// Service implementing account registration, login, and student admin.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    rooms: Arc<RoomDirectoryService>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Create the service over its storage and hashing capabilities.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        rooms: Arc<RoomDirectoryService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            rooms,
            clock,
        }
    }

    /// Register a new account.
    ///
    /// The repository enforces email uniqueness atomically with the insert;
    /// the pre-check only gives the common case a clearer error before the
    /// password is hashed.
    pub async fn register(&self, details: &RegistrationDetails) -> ApiResult<Account> {
        let email = details.credentials().email();
        if self
            .accounts
            .find_by_email(email)
            .await
            .map_err(map_account_repo_error)?
            .is_some()
        {
            return Err(Error::conflict("email address is already registered"));
        }

        let credential_hash = self
            .hasher
            .hash(details.credentials().password())
            .map_err(map_hasher_error)?;
        let account = Account {
            id: AccountId::random(),
            email: email.clone(),
            credential_hash,
            display_name: details.display_name().clone(),
            role: details.role(),
            assigned_room: None,
            phone: details.phone().map(str::to_owned),
            created_at: self.clock.utc(),
        };
        self.accounts
            .insert(&account)
            .await
            .map_err(map_account_repo_error)?;
        info!(account_id = %account.id, role = %account.role, "account registered");
        Ok(account)
    }

    /// Authenticate credentials against the stored hash.
    ///
    /// Unknown email and wrong password report the same error.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> ApiResult<Account> {
        let account = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::unauthenticated("invalid email or password"))?;

        let verified = self
            .hasher
            .verify(credentials.password(), &account.credential_hash)
            .map_err(map_hasher_error)?;
        if !verified {
            return Err(Error::unauthenticated("invalid email or password"));
        }
        debug!(account_id = %account.id, "credentials verified");
        Ok(account)
    }

    /// Load the caller's own account.
    pub async fn current_account(&self, identity: &Identity) -> ApiResult<Account> {
        self.accounts
            .find_by_id(&identity.subject_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::unauthenticated("account no longer exists"))
    }

    /// List every student account (admin only).
    pub async fn list_students(&self, identity: &Identity) -> ApiResult<Vec<Account>> {
        identity.require_admin()?;
        self.accounts
            .list_by_role(Role::Student)
            .await
            .map_err(map_account_repo_error)
    }

    /// Delete a student account (admin only).
    ///
    /// Room occupancy is released first so the room never keeps a dangling
    /// occupant entry.
    pub async fn delete_student(&self, identity: &Identity, student_id: &AccountId) -> ApiResult<()> {
        identity.require_admin()?;

        let account = self
            .accounts
            .find_by_id(student_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::not_found("student not found"))?;
        if !account.is_student() {
            return Err(Error::not_found("student not found"));
        }

        self.rooms.unassign(student_id).await?;
        self.accounts
            .delete(student_id)
            .await
            .map_err(map_account_repo_error)?;
        info!(account_id = %student_id, "student account deleted");
        Ok(())
    }
}
