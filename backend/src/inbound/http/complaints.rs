//! Complaint API handlers.
//!
//! ```text
//! GET /api/v1/complaints
//! POST /api/v1/complaints {"title":"Leaky tap","description":"...","category":"plumbing"}
//! PUT /api/v1/complaints/{complaint_id}/status {"status":"resolved"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::records::{Complaint, ComplaintCategory, ComplaintStatus};
use crate::domain::{Error, NewComplaint};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// New-complaint request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
}

/// Status-change request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct ComplaintStatusRequest {
    pub status: ComplaintStatus,
}

/// List complaints visible to the caller.
///
/// Admins see every complaint; students only their own.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    responses(
        (status = 200, description = "Visible complaints", body = [Complaint]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Complaint>>> {
    let identity = session.require_identity()?;
    let complaints = state.complaints.list(&identity).await?;
    Ok(web::Json(complaints))
}

/// File a complaint against the calling student's current room.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = Complaint),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 412, description = "No room assigned", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "createComplaint"
)]
#[post("/complaints")]
pub async fn create_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let payload = payload.into_inner();
    let complaint = state
        .complaints
        .file(
            &identity,
            NewComplaint {
                title: payload.title,
                description: payload.description,
                category: payload.category,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(complaint))
}

/// Move a complaint's status.
#[utoipa::path(
    put,
    path = "/api/v1/complaints/{complaint_id}/status",
    params(("complaint_id" = Uuid, Path, description = "Complaint identifier")),
    request_body = ComplaintStatusRequest,
    responses(
        (status = 200, description = "Updated complaint", body = Complaint),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Complaint not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaintStatus"
)]
#[put("/complaints/{complaint_id}/status")]
pub async fn update_complaint_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ComplaintStatusRequest>,
) -> ApiResult<web::Json<Complaint>> {
    let identity = session.require_identity()?;
    let complaint = state
        .complaints
        .update_status(&identity, &path.into_inner(), payload.status)
        .await?;
    Ok(web::Json(complaint))
}
