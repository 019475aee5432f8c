//! Renewal-workflow service.
//!
//! Implements the renewal-form lifecycle on top of the form repository:
//! creation gated on a current room assignment, role-scoped listing and
//! reads, admin review transitions, student attachment corrections, and
//! admin deletion with best-effort blob cleanup.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ApiResult;
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AttachmentBlobStore, RenewalFormRepository,
    RenewalFormRepositoryError,
};
use crate::domain::renewal::{
    AttachmentSlot, FormId, RenewalForm, ReviewUpdate, TerminalTransitionPolicy,
};

fn map_form_repo_error(error: RenewalFormRepositoryError) -> Error {
    match error {
        RenewalFormRepositoryError::DuplicatePending => {
            Error::conflict("a renewal form is already pending for this student")
                .with_details(serde_json::json!({"reason": "duplicate_pending_form"}))
        }
        RenewalFormRepositoryError::Missing => Error::not_found("renewal form not found"),
        RenewalFormRepositoryError::Storage { message } => {
            Error::internal(format!("renewal form store error: {message}"))
        }
    }
}

fn map_account_repo_error(error: AccountRepositoryError) -> Error {
    Error::internal(format!("account store error: {error}"))
}

/// Service implementing the renewal-form workflow.
#[derive(Clone)]
pub struct RenewalWorkflowService {
    forms: Arc<dyn RenewalFormRepository>,
    accounts: Arc<dyn AccountRepository>,
    blobs: Arc<dyn AttachmentBlobStore>,
    clock: Arc<dyn Clock>,
    terminal_policy: TerminalTransitionPolicy,
}

impl RenewalWorkflowService {
    /// Create the service over its storage capabilities.
    pub fn new(
        forms: Arc<dyn RenewalFormRepository>,
        accounts: Arc<dyn AccountRepository>,
        blobs: Arc<dyn AttachmentBlobStore>,
        clock: Arc<dyn Clock>,
        terminal_policy: TerminalTransitionPolicy,
    ) -> Self {
        Self {
            forms,
            accounts,
            blobs,
            clock,
            terminal_policy,
        }
    }

    /// Submit a new renewal form for the calling student.
    ///
    /// The form snapshots the student's current room assignment; students
    /// without a room cannot submit. The repository serialises concurrent
    /// submissions so a student never holds two pending forms.
    pub async fn create(
        &self,
        identity: &Identity,
        attachments: BTreeMap<AttachmentSlot, String>,
    ) -> ApiResult<RenewalForm> {
        identity.require_student()?;

        let account = self
            .accounts
            .find_by_id(&identity.subject_id)
            .await
            .map_err(map_account_repo_error)?
            .ok_or_else(|| Error::unauthenticated("account no longer exists"))?;

        let room_number = account.assigned_room.ok_or_else(|| {
            Error::precondition_failed("a room assignment is required before submitting")
                .with_details(serde_json::json!({"reason": "no_room_assigned"}))
        })?;

        let form = RenewalForm::submitted(
            identity.subject_id,
            room_number,
            attachments,
            self.clock.utc(),
        );
        self.forms
            .insert_pending(&form)
            .await
            .map_err(map_form_repo_error)?;
        debug!(form_id = %form.id, "renewal form submitted");
        Ok(form)
    }

    /// List forms visible to the caller: every form for admins, own forms
    /// for students.
    pub async fn list(&self, identity: &Identity) -> ApiResult<Vec<RenewalForm>> {
        let forms = if identity.is_admin() {
            self.forms.list_all().await
        } else {
            self.forms.list_for_student(&identity.subject_id).await
        };
        forms.map_err(map_form_repo_error)
    }

    /// Fetch one form; students may only read their own.
    pub async fn get(&self, identity: &Identity, form_id: &FormId) -> ApiResult<RenewalForm> {
        let form = self
            .forms
            .find(form_id)
            .await
            .map_err(map_form_repo_error)?
            .ok_or_else(|| Error::not_found("renewal form not found"))?;
        if !identity.is_admin() && form.student_id != identity.subject_id {
            return Err(Error::forbidden("renewal form belongs to another student"));
        }
        Ok(form)
    }

    /// Apply an admin review update (status and/or comments).
    pub async fn update_status(
        &self,
        identity: &Identity,
        form_id: &FormId,
        update: ReviewUpdate,
    ) -> ApiResult<RenewalForm> {
        identity.require_admin()?;

        let mut form = self
            .forms
            .find(form_id)
            .await
            .map_err(map_form_repo_error)?
            .ok_or_else(|| Error::not_found("renewal form not found"))?;

        let changed = form
            .apply_review(update, identity.subject_id, self.clock.utc(), self.terminal_policy)
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        if changed {
            self.forms.update(&form).await.map_err(map_form_repo_error)?;
        }
        Ok(form)
    }

    /// Merge an attachment patch from the owning student.
    pub async fn update_attachments(
        &self,
        identity: &Identity,
        form_id: &FormId,
        patch: BTreeMap<AttachmentSlot, String>,
    ) -> ApiResult<RenewalForm> {
        identity.require_student()?;

        let mut form = self
            .forms
            .find(form_id)
            .await
            .map_err(map_form_repo_error)?
            .ok_or_else(|| Error::not_found("renewal form not found"))?;
        if form.student_id != identity.subject_id {
            return Err(Error::forbidden("renewal form belongs to another student"));
        }

        form.merge_attachments(patch, self.clock.utc())
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.forms.update(&form).await.map_err(map_form_repo_error)?;
        Ok(form)
    }

    /// Delete a form and its stored attachments (admin only).
    ///
    /// Blob cleanup is best effort: a failing removal is logged and the
    /// document deletion still proceeds.
    pub async fn delete(&self, identity: &Identity, form_id: &FormId) -> ApiResult<()> {
        identity.require_admin()?;

        let form = self
            .forms
            .find(form_id)
            .await
            .map_err(map_form_repo_error)?
            .ok_or_else(|| Error::not_found("renewal form not found"))?;

        for (slot, stored_name) in &form.attachments {
            match self.blobs.remove(&form.student_id, stored_name).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(form_id = %form.id, slot = %slot, "attachment blob already absent");
                }
                Err(err) => {
                    warn!(
                        form_id = %form.id,
                        slot = %slot,
                        error = %err,
                        "failed to remove attachment blob",
                    );
                }
            }
        }

        self.forms
            .delete(form_id)
            .await
            .map_err(map_form_repo_error)?;
        Ok(())
    }
}
