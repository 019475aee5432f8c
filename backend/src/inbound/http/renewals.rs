//! Renewal-form API handlers.
//!
//! ```text
//! GET /api/v1/renewal-forms
//! POST /api/v1/renewal-forms {"attachments":{"photo":"photo_1.png"}}
//! GET /api/v1/renewal-forms/{form_id}
//! PUT /api/v1/renewal-forms/{form_id} {"status":"approved","comments":"ok"}
//! PUT /api/v1/renewal-forms/{form_id}/files {"attachments":{"aadhar":"aadhar_2.pdf"}}
//! DELETE /api/v1/renewal-forms/{form_id}
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AttachmentSlot, Error, FormId, FormStatus, RenewalForm, ReviewUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Submission request body; attachment references are optional at creation.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateRenewalRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attachments: BTreeMap<AttachmentSlot, String>,
}

/// Admin review request body; both fields optional, an empty comment string
/// still replaces the stored comments.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReviewRequest {
    #[serde(default)]
    pub status: Option<FormStatus>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Attachment patch request body from the owning student.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AttachmentsPatchRequest {
    #[schema(value_type = Object)]
    pub attachments: BTreeMap<AttachmentSlot, String>,
}

/// List renewal forms visible to the caller, newest first.
///
/// Admins see every form; students only their own.
#[utoipa::path(
    get,
    path = "/api/v1/renewal-forms",
    responses(
        (status = 200, description = "Visible forms", body = [RenewalForm]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["renewals"],
    operation_id = "listRenewalForms"
)]
#[get("/renewal-forms")]
pub async fn list_renewal_forms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RenewalForm>>> {
    let identity = session.require_identity()?;
    let forms = state.renewals.list(&identity).await?;
    Ok(web::Json(forms))
}

/// Submit a renewal form for the calling student's current room.
#[utoipa::path(
    post,
    path = "/api/v1/renewal-forms",
    request_body = CreateRenewalRequest,
    responses(
        (status = 201, description = "Form submitted", body = RenewalForm),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "A pending form already exists", body = Error),
        (status = 412, description = "No room assigned", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["renewals"],
    operation_id = "createRenewalForm"
)]
#[post("/renewal-forms")]
pub async fn create_renewal_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRenewalRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let form = state
        .renewals
        .create(&identity, payload.into_inner().attachments)
        .await?;
    Ok(HttpResponse::Created().json(form))
}

/// Fetch one renewal form.
#[utoipa::path(
    get,
    path = "/api/v1/renewal-forms/{form_id}",
    params(("form_id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "The form", body = RenewalForm),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Form belongs to another student", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["renewals"],
    operation_id = "getRenewalForm"
)]
#[get("/renewal-forms/{form_id}")]
pub async fn get_renewal_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormId>,
) -> ApiResult<web::Json<RenewalForm>> {
    let identity = session.require_identity()?;
    let form = state.renewals.get(&identity, &path.into_inner()).await?;
    Ok(web::Json(form))
}

/// Apply an admin review update (status and/or comments).
#[utoipa::path(
    put,
    path = "/api/v1/renewal-forms/{form_id}",
    params(("form_id" = String, Path, description = "Form identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Updated form", body = RenewalForm),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 409, description = "Form already decided", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["renewals"],
    operation_id = "reviewRenewalForm"
)]
#[put("/renewal-forms/{form_id}")]
pub async fn review_renewal_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormId>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<RenewalForm>> {
    let identity = session.require_identity()?;
    let payload = payload.into_inner();
    let update = ReviewUpdate {
        status: payload.status,
        comments: payload.comments,
    };
    let form = state
        .renewals
        .update_status(&identity, &path.into_inner(), update)
        .await?;
    Ok(web::Json(form))
}

/// Merge an attachment patch from the owning student.
///
/// A form under review drops back to `submitted` so the correction forces
/// re-review.
#[utoipa::path(
    put,
    path = "/api/v1/renewal-forms/{form_id}/files",
    params(("form_id" = String, Path, description = "Form identifier")),
    request_body = AttachmentsPatchRequest,
    responses(
        (status = 200, description = "Updated form", body = RenewalForm),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Form belongs to another student", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 409, description = "Form already decided", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["renewals"],
    operation_id = "patchRenewalAttachments"
)]
#[put("/renewal-forms/{form_id}/files")]
pub async fn patch_renewal_attachments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormId>,
    payload: web::Json<AttachmentsPatchRequest>,
) -> ApiResult<web::Json<RenewalForm>> {
    let identity = session.require_identity()?;
    let form = state
        .renewals
        .update_attachments(&identity, &path.into_inner(), payload.into_inner().attachments)
        .await?;
    Ok(web::Json(form))
}

/// Delete a form and its stored attachments.
#[utoipa::path(
    delete,
    path = "/api/v1/renewal-forms/{form_id}",
    params(("form_id" = String, Path, description = "Form identifier")),
    responses(
        (status = 204, description = "Form deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Form not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["renewals"],
    operation_id = "deleteRenewalForm"
)]
#[delete("/renewal-forms/{form_id}")]
pub async fn delete_renewal_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<FormId>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    state.renewals.delete(&identity, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
