//! Memory-backed renewal-form repository.

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::ports::{RenewalFormRepository, RenewalFormRepositoryError};
use crate::domain::renewal::{FormId, RenewalForm};

use super::memory_document_store::MemoryDocumentStore;

/// [`RenewalFormRepository`] over the shared memory store.
#[derive(Debug, Clone)]
pub struct MemoryRenewalFormRepository {
    store: MemoryDocumentStore,
}

impl MemoryRenewalFormRepository {
    pub(super) fn new(store: MemoryDocumentStore) -> Self {
        Self { store }
    }
}

fn poisoned() -> RenewalFormRepositoryError {
    RenewalFormRepositoryError::storage("document store lock poisoned")
}

fn newest_first(forms: &mut [RenewalForm]) {
    forms.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl RenewalFormRepository for MemoryRenewalFormRepository {
    async fn insert_pending(
        &self,
        form: &RenewalForm,
    ) -> Result<(), RenewalFormRepositoryError> {
        // The uniqueness scan and the insert share one write guard, so two
        // concurrent submissions for the same student serialise here.
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if state
            .forms
            .values()
            .any(|existing| existing.student_id == form.student_id && existing.status.is_pending())
        {
            return Err(RenewalFormRepositoryError::DuplicatePending);
        }
        state.forms.insert(form.id, form.clone());
        Ok(())
    }

    async fn find(&self, id: &FormId) -> Result<Option<RenewalForm>, RenewalFormRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        Ok(state.forms.get(id).cloned())
    }

    async fn update(&self, form: &RenewalForm) -> Result<(), RenewalFormRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        if !state.forms.contains_key(&form.id) {
            return Err(RenewalFormRepositoryError::Missing);
        }
        state.forms.insert(form.id, form.clone());
        Ok(())
    }

    async fn delete(&self, id: &FormId) -> Result<bool, RenewalFormRepositoryError> {
        let mut state = self.store.write().ok_or_else(poisoned)?;
        Ok(state.forms.remove(id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<RenewalForm>, RenewalFormRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        let mut forms: Vec<RenewalForm> = state.forms.values().cloned().collect();
        newest_first(&mut forms);
        Ok(forms)
    }

    async fn list_for_student(
        &self,
        student_id: &AccountId,
    ) -> Result<Vec<RenewalForm>, RenewalFormRepositoryError> {
        let state = self.store.read().ok_or_else(poisoned)?;
        let mut forms: Vec<RenewalForm> = state
            .forms
            .values()
            .filter(|form| &form.student_id == student_id)
            .cloned()
            .collect();
        newest_first(&mut forms);
        Ok(forms)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::collections::BTreeMap;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::renewal::FormStatus;
    use crate::domain::room::RoomNumber;

    fn form(student_id: AccountId) -> RenewalForm {
        RenewalForm::submitted(
            student_id,
            RoomNumber::new("A101").expect("valid room number"),
            BTreeMap::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn a_student_cannot_hold_two_pending_forms() {
        let repo = MemoryDocumentStore::new().renewal_form_repository();
        let student_id = AccountId::random();
        repo.insert_pending(&form(student_id))
            .await
            .expect("first form");
        let err = repo
            .insert_pending(&form(student_id))
            .await
            .expect_err("second pending form");
        assert_eq!(err, RenewalFormRepositoryError::DuplicatePending);
    }

    #[tokio::test]
    async fn a_decided_form_frees_the_pending_slot() {
        let repo = MemoryDocumentStore::new().renewal_form_repository();
        let student_id = AccountId::random();
        let mut first = form(student_id);
        repo.insert_pending(&first).await.expect("first form");

        first.status = FormStatus::Rejected;
        repo.update(&first).await.expect("decision recorded");
        repo.insert_pending(&form(student_id))
            .await
            .expect("new submission after decision");
    }

    #[tokio::test]
    async fn listings_are_newest_first_and_student_scoped() {
        let repo = MemoryDocumentStore::new().renewal_form_repository();
        let student_id = AccountId::random();
        let mut older = form(student_id);
        older.created_at = older.created_at - Duration::days(30);
        older.status = FormStatus::Approved;
        repo.insert_pending(&older).await.expect("older form");
        let newer = form(student_id);
        repo.insert_pending(&newer).await.expect("newer form");
        repo.insert_pending(&form(AccountId::random()))
            .await
            .expect("foreign form");

        let all = repo.list_all().await.expect("list all");
        assert_eq!(all.len(), 3);

        let own = repo
            .list_for_student(&student_id)
            .await
            .expect("student list");
        let ids: Vec<FormId> = own.iter().map(|form| form.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn delete_reports_whether_the_form_existed() {
        let repo = MemoryDocumentStore::new().renewal_form_repository();
        let stored = form(AccountId::random());
        repo.insert_pending(&stored).await.expect("insert");
        assert!(repo.delete(&stored.id).await.expect("delete"));
        assert!(!repo.delete(&stored.id).await.expect("second delete"));
        assert!(repo.find(&stored.id).await.expect("find").is_none());
    }
}
