//! Port for renewal-form document persistence.

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::renewal::{FormId, RenewalForm};

/// Errors raised by renewal-form repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenewalFormRepositoryError {
    /// The student already has a pending (`submitted`/`under_review`) form.
    #[error("student already has a pending renewal form")]
    DuplicatePending,
    /// The targeted form document does not exist.
    #[error("renewal form does not exist")]
    Missing,
    /// The store failed during the operation.
    #[error("renewal form store failed: {message}")]
    Storage {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl RenewalFormRepositoryError {
    /// Build a [`RenewalFormRepositoryError::Storage`] from any message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for reading and writing renewal-form documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RenewalFormRepository: Send + Sync {
    /// Insert a new form, enforcing the at-most-one-pending-form-per-student
    /// invariant atomically with the insert (the unique-constraint-backed
    /// shape): concurrent creates for one student serialize here, and the
    /// loser receives [`RenewalFormRepositoryError::DuplicatePending`].
    async fn insert_pending(&self, form: &RenewalForm)
        -> Result<(), RenewalFormRepositoryError>;

    /// Find a form by id.
    async fn find(&self, id: &FormId) -> Result<Option<RenewalForm>, RenewalFormRepositoryError>;

    /// Overwrite an existing form document.
    async fn update(&self, form: &RenewalForm) -> Result<(), RenewalFormRepositoryError>;

    /// Delete a form; returns whether it existed.
    async fn delete(&self, id: &FormId) -> Result<bool, RenewalFormRepositoryError>;

    /// List every form (admin scope).
    async fn list_all(&self) -> Result<Vec<RenewalForm>, RenewalFormRepositoryError>;

    /// List the forms owned by one student.
    async fn list_for_student(
        &self,
        student_id: &AccountId,
    ) -> Result<Vec<RenewalForm>, RenewalFormRepositoryError>;
}
