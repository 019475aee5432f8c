//! Renewal-form entity and its state machine.
//!
//! States: `submitted → under_review → {approved, rejected}`, with the
//! direct `submitted → {approved, rejected}` shortcut when an admin skips
//! review. `approved` and `rejected` are terminal: no operation may change
//! status, comments, or attachments on a terminal form unless the explicit
//! reopen policy allows it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::room::RoomNumber;

/// Stable renewal-form identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct FormId(Uuid);

impl FormId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for FormId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Renewal-form lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    /// Initial state on creation; awaiting review.
    Submitted,
    /// An admin has started reviewing.
    UnderReview,
    /// Terminal: accepted.
    Approved,
    /// Terminal: declined.
    Rejected,
}

impl FormStatus {
    /// Whether the status forbids further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether the status counts against the one-pending-form-per-student
    /// limit.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview)
    }

    /// Stable wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised form status: {value}")]
pub struct UnknownFormStatus {
    /// The rejected input.
    pub value: String,
}

impl FromStr for FormStatus {
    type Err = UnknownFormStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownFormStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Fixed document categories a renewal form tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSlot {
    /// Identity document.
    Aadhar,
    /// Academic result.
    Result,
    /// Caste certificate.
    CasteCert,
    /// Passport photo.
    Photo,
}

impl AttachmentSlot {
    /// All recognised slots.
    pub const ALL: [Self; 4] = [Self::Aadhar, Self::Result, Self::CasteCert, Self::Photo];

    /// Stable wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aadhar => "aadhar",
            Self::Result => "result",
            Self::CasteCert => "caste_cert",
            Self::Photo => "photo",
        }
    }
}

impl fmt::Display for AttachmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised slot name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised attachment slot: {value}")]
pub struct UnknownAttachmentSlot {
    /// The rejected input.
    pub value: String,
}

impl FromStr for AttachmentSlot {
    type Err = UnknownAttachmentSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aadhar" => Ok(Self::Aadhar),
            "result" => Ok(Self::Result),
            "caste_cert" => Ok(Self::CasteCert),
            "photo" => Ok(Self::Photo),
            other => Err(UnknownAttachmentSlot {
                value: other.to_owned(),
            }),
        }
    }
}

/// Whether an admin may move a form out of a terminal state.
///
/// The original system silently permitted it; this makes the behaviour an
/// explicit configuration choice instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalTransitionPolicy {
    /// Terminal forms are immutable; any review update fails `InvalidState`.
    #[default]
    Reject,
    /// Admins may reopen terminal forms for corrections.
    Allow,
}

/// Error raised when mutating a form in a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("form is {status} and can no longer be modified")]
pub struct TerminalFormError {
    /// The terminal status the form is in.
    pub status: FormStatus,
}

/// Admin review update: both fields optional, `Some("")` comments are
/// distinct from "not provided".
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    /// New lifecycle status, when provided.
    pub status: Option<FormStatus>,
    /// Replacement admin comments, when provided (may be empty).
    pub comments: Option<String>,
}

/// Renewal form.
///
/// ## Invariants
/// - `student_id` and `room_number` are immutable after creation.
/// - At most one form per student is pending (`submitted`/`under_review`)
///   at any time; enforced by the repository's pending-unique insert.
/// - Terminal forms reject mutation unless the reopen policy allows it.
///
/// The serde layout is the persisted document layout and must round-trip
/// unchanged through any storage substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RenewalForm {
    /// Stable identifier.
    #[serde(rename = "form_id")]
    pub id: FormId,
    /// Owning student; immutable.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub student_id: AccountId,
    /// Room snapshot taken at creation; immutable.
    pub room_number: RoomNumber,
    /// Lifecycle status.
    pub status: FormStatus,
    /// Slot to stored-file-reference mapping; not all slots are required.
    #[schema(value_type = Object)]
    pub attachments: BTreeMap<AttachmentSlot, String>,
    /// Reviewer commentary, set only by admins.
    pub admin_comments: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the form reached a terminal decision.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Admin who made the terminal decision.
    #[schema(value_type = Option<String>)]
    pub reviewed_by: Option<AccountId>,
}

impl RenewalForm {
    /// Create a freshly submitted form.
    pub fn submitted(
        student_id: AccountId,
        room_number: RoomNumber,
        attachments: BTreeMap<AttachmentSlot, String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: FormId::random(),
            student_id,
            room_number,
            status: FormStatus::Submitted,
            attachments,
            admin_comments: None,
            created_at: now,
            updated_at: now,
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    /// Whether the form is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Apply an admin review update.
    ///
    /// Terminal forms reject the whole update under
    /// [`TerminalTransitionPolicy::Reject`]. A terminal target status stamps
    /// `reviewed_at`/`reviewed_by`. Returns whether any field changed.
    pub fn apply_review(
        &mut self,
        update: ReviewUpdate,
        reviewer: AccountId,
        now: DateTime<Utc>,
        policy: TerminalTransitionPolicy,
    ) -> Result<bool, TerminalFormError> {
        if self.is_terminal() && policy == TerminalTransitionPolicy::Reject {
            return Err(TerminalFormError {
                status: self.status,
            });
        }

        let mut changed = false;
        if let Some(status) = update.status {
            self.status = status;
            if status.is_terminal() {
                self.reviewed_at = Some(now);
                self.reviewed_by = Some(reviewer);
            }
            changed = true;
        }
        if let Some(comments) = update.comments {
            self.admin_comments = Some(comments);
            changed = true;
        }
        if changed {
            self.updated_at = now;
        }
        Ok(changed)
    }

    /// Merge an attachment patch from the owning student.
    ///
    /// Patch entries overwrite same-slot entries; other slots are untouched.
    /// A form under review is demoted back to `submitted` so the correction
    /// forces re-review. Terminal forms always reject the patch.
    pub fn merge_attachments(
        &mut self,
        patch: BTreeMap<AttachmentSlot, String>,
        now: DateTime<Utc>,
    ) -> Result<(), TerminalFormError> {
        if self.is_terminal() {
            return Err(TerminalFormError {
                status: self.status,
            });
        }

        self.attachments.extend(patch);
        if self.status == FormStatus::UnderReview {
            self.status = FormStatus::Submitted;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn form() -> RenewalForm {
        RenewalForm::submitted(
            AccountId::random(),
            RoomNumber::new("A101").expect("valid room number"),
            BTreeMap::from([(AttachmentSlot::Photo, "photo_1.png".to_owned())]),
            Utc::now(),
        )
    }

    #[rstest]
    #[case(FormStatus::Submitted, false, true)]
    #[case(FormStatus::UnderReview, false, true)]
    #[case(FormStatus::Approved, true, false)]
    #[case(FormStatus::Rejected, true, false)]
    fn status_classification(
        #[case] status: FormStatus,
        #[case] terminal: bool,
        #[case] pending: bool,
    ) {
        assert_eq!(status.is_terminal(), terminal);
        assert_eq!(status.is_pending(), pending);
    }

    #[rstest]
    fn review_to_terminal_stamps_reviewer() {
        let mut form = form();
        let reviewer = AccountId::random();
        let now = Utc::now();
        let changed = form
            .apply_review(
                ReviewUpdate {
                    status: Some(FormStatus::Approved),
                    comments: None,
                },
                reviewer,
                now,
                TerminalTransitionPolicy::Reject,
            )
            .expect("live form accepts review");
        assert!(changed);
        assert_eq!(form.status, FormStatus::Approved);
        assert_eq!(form.reviewed_at, Some(now));
        assert_eq!(form.reviewed_by, Some(reviewer));
    }

    #[rstest]
    fn review_to_under_review_leaves_reviewer_unset() {
        let mut form = form();
        form.apply_review(
            ReviewUpdate {
                status: Some(FormStatus::UnderReview),
                comments: Some("checking docs".to_owned()),
            },
            AccountId::random(),
            Utc::now(),
            TerminalTransitionPolicy::Reject,
        )
        .expect("live form accepts review");
        assert_eq!(form.status, FormStatus::UnderReview);
        assert!(form.reviewed_at.is_none());
        assert_eq!(form.admin_comments.as_deref(), Some("checking docs"));
    }

    #[rstest]
    fn empty_comment_is_distinct_from_absent() {
        let mut form = form();
        form.apply_review(
            ReviewUpdate {
                status: None,
                comments: Some(String::new()),
            },
            AccountId::random(),
            Utc::now(),
            TerminalTransitionPolicy::Reject,
        )
        .expect("live form accepts review");
        assert_eq!(form.admin_comments.as_deref(), Some(""));
    }

    #[rstest]
    fn terminal_form_rejects_review_under_reject_policy() {
        let mut form = form();
        form.status = FormStatus::Rejected;
        let err = form
            .apply_review(
                ReviewUpdate {
                    status: Some(FormStatus::Submitted),
                    comments: None,
                },
                AccountId::random(),
                Utc::now(),
                TerminalTransitionPolicy::Reject,
            )
            .expect_err("terminal form is immutable");
        assert_eq!(err.status, FormStatus::Rejected);
    }

    #[rstest]
    fn terminal_form_reopens_under_allow_policy() {
        let mut form = form();
        form.status = FormStatus::Approved;
        form.apply_review(
            ReviewUpdate {
                status: Some(FormStatus::Submitted),
                comments: None,
            },
            AccountId::random(),
            Utc::now(),
            TerminalTransitionPolicy::Allow,
        )
        .expect("allow policy permits reopening");
        assert_eq!(form.status, FormStatus::Submitted);
    }

    #[rstest]
    fn attachment_patch_overwrites_same_slot_only() {
        let mut form = form();
        form.attachments
            .insert(AttachmentSlot::Aadhar, "aadhar_old.pdf".to_owned());
        form.merge_attachments(
            BTreeMap::from([(AttachmentSlot::Aadhar, "aadhar_new.pdf".to_owned())]),
            Utc::now(),
        )
        .expect("live form accepts patch");
        assert_eq!(
            form.attachments.get(&AttachmentSlot::Aadhar).map(String::as_str),
            Some("aadhar_new.pdf")
        );
        assert_eq!(
            form.attachments.get(&AttachmentSlot::Photo).map(String::as_str),
            Some("photo_1.png")
        );
    }

    #[rstest]
    fn patch_demotes_under_review_to_submitted() {
        let mut form = form();
        form.status = FormStatus::UnderReview;
        form.merge_attachments(BTreeMap::new(), Utc::now())
            .expect("live form accepts patch");
        assert_eq!(form.status, FormStatus::Submitted);
    }

    #[rstest]
    fn patch_leaves_submitted_unchanged() {
        let mut form = form();
        form.merge_attachments(BTreeMap::new(), Utc::now())
            .expect("live form accepts patch");
        assert_eq!(form.status, FormStatus::Submitted);
    }

    #[rstest]
    #[case(FormStatus::Approved)]
    #[case(FormStatus::Rejected)]
    fn patch_is_rejected_on_terminal_forms(#[case] status: FormStatus) {
        let mut form = form();
        form.status = status;
        let err = form
            .merge_attachments(BTreeMap::new(), Utc::now())
            .expect_err("terminal form is immutable");
        assert_eq!(err.status, status);
    }

    #[rstest]
    fn persisted_layout_round_trips() {
        let form = form();
        let json = serde_json::to_value(&form).expect("serializable form");
        assert!(json.get("form_id").is_some());
        assert!(json.get("student_id").is_some());
        assert_eq!(json["status"], "submitted");
        assert_eq!(json["attachments"]["photo"], "photo_1.png");
        let back: RenewalForm = serde_json::from_value(json).expect("deserializable form");
        assert_eq!(back, form);
    }
}
