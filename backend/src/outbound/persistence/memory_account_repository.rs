//! Memory-backed account repository.

use async_trait::async_trait;

use crate::domain::account::{Account, AccountId, Email};
use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::role::Role;

use super::memory_document_store::MemoryDocumentStore;

/// [`AccountRepository`] over the shared memory store.
#[derive(Debug, Clone)]
pub struct MemoryAccountRepository {
    store: MemoryDocumentStore,
}

impl MemoryAccountRepository {
    pub(super) fn new(store: MemoryDocumentStore) -> Self {
        Self { store }
    }
}

fn poisoned() -> AccountRepositoryError {
    AccountRepositoryError::storage("document store lock poisoned")
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if state
            .accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(AccountRepositoryError::DuplicateEmail);
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        Ok(state.accounts.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        Ok(state
            .accounts
            .values()
            .find(|account| &account.email == email)
            .cloned())
    }

    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if !state.accounts.contains_key(&account.id) {
            return Err(AccountRepositoryError::Missing);
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete(&self, id: &AccountId) -> Result<bool, AccountRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        Ok(state.accounts.remove(id).is_some())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, AccountRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|account| account.role == role)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;

    use super::*;
    use crate::domain::account::DisplayName;

    fn account(email: &str, role: Role) -> Account {
        Account {
            id: AccountId::random(),
            email: Email::new(email).expect("valid email"),
            credential_hash: "$argon2id$fixture".to_owned(),
            display_name: DisplayName::new("Resident").expect("valid name"),
            role,
            assigned_room: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn email_uniqueness_is_enforced_on_insert() {
        let repo = MemoryDocumentStore::new().account_repository();
        repo.insert(&account("a@hostel.edu", Role::Student))
            .await
            .expect("first insert");
        let err = repo
            .insert(&account("a@hostel.edu", Role::Student))
            .await
            .expect_err("duplicate email");
        assert_eq!(err, AccountRepositoryError::DuplicateEmail);
    }

    #[tokio::test]
    async fn lookup_update_and_delete_round_trip() {
        let repo = MemoryDocumentStore::new().account_repository();
        let mut stored = account("b@hostel.edu", Role::Student);
        repo.insert(&stored).await.expect("insert");

        let by_email = repo
            .find_by_email(&stored.email)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(by_email.id, stored.id);

        stored.phone = Some("9876543210".to_owned());
        repo.update(&stored).await.expect("update");
        let by_id = repo
            .find_by_id(&stored.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(by_id.phone.as_deref(), Some("9876543210"));

        assert!(repo.delete(&stored.id).await.expect("delete"));
        assert!(!repo.delete(&stored.id).await.expect("second delete"));
        let err = repo.update(&stored).await.expect_err("update after delete");
        assert_eq!(err, AccountRepositoryError::Missing);
    }

    #[tokio::test]
    async fn role_listing_filters_and_orders_by_creation() {
        let repo = MemoryDocumentStore::new().account_repository();
        repo.insert(&account("warden@hostel.edu", Role::Admin))
            .await
            .expect("admin insert");
        repo.insert(&account("s1@hostel.edu", Role::Student))
            .await
            .expect("student insert");
        repo.insert(&account("s2@hostel.edu", Role::Student))
            .await
            .expect("student insert");

        let students = repo.list_by_role(Role::Student).await.expect("list");
        assert_eq!(students.len(), 2);
        assert!(students.iter().all(Account::is_student));
    }
}
