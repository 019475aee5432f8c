//! Student directory API handlers (admin only).
//!
//! ```text
//! GET /api/v1/students
//! DELETE /api/v1/students/{student_id}
//! ```

use actix_web::{HttpResponse, delete, get, web};
use uuid::Uuid;

use crate::domain::{AccountId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AccountView;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// List all student accounts.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "Student accounts", body = [AccountView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AccountView>>> {
    let identity = session.require_identity()?;
    let students = state.accounts.list_students(&identity).await?;
    Ok(web::Json(
        students.into_iter().map(AccountView::from).collect(),
    ))
}

/// Remove a student account, including any room assignment it holds.
#[utoipa::path(
    delete,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Student removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Student not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[delete("/students/{student_id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let student_id = AccountId::from(path.into_inner());
    state.accounts.delete_student(&identity, &student_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
