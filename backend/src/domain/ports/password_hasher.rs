//! Port for credential hashing.
//!
//! Hashing mechanics stay outside the domain; services only see opaque PHC
//! strings.

/// Errors raised by password hasher adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHasherError {
    /// Hashing or verification failed inside the adapter.
    #[error("password hashing failed: {message}")]
    Hash {
        /// Adapter-specific failure description.
        message: String,
    },
}

impl PasswordHasherError {
    /// Build a [`PasswordHasherError::Hash`] from any message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// Port for hashing and verifying passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Verify a password against a stored PHC string.
    fn verify(&self, password: &str, credential_hash: &str)
        -> Result<bool, PasswordHasherError>;
}
