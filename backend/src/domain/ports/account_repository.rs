//! Port for account document persistence.

use async_trait::async_trait;

use crate::domain::account::{Account, AccountId, Email};
use crate::domain::role::Role;

/// Errors raised by account repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountRepositoryError {
    /// An account with the same email already exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,
    /// The targeted account document does not exist.
    #[error("account does not exist")]
    Missing,
    /// The store failed during the operation.
    #[error("account store failed: {message}")]
    Storage {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl AccountRepositoryError {
    /// Build a [`AccountRepositoryError::Storage`] from any message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for reading and writing account documents.
///
/// Adapters enforce email uniqueness atomically with the insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; fails on a duplicate email.
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Find an account by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Overwrite an existing account document.
    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Delete an account; returns whether it existed.
    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError>;

    /// List all accounts holding the given role.
    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, AccountRepositoryError>;
}
