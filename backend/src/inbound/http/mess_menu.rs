//! Mess-menu API handlers.
//!
//! ```text
//! GET /api/v1/mess-menu
//! POST /api/v1/mess-menu {"day":"monday","mealType":"breakfast","items":["Poha","Tea"]}
//! DELETE /api/v1/mess-menu/{menu_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::records::{MealType, MenuDay, MessMenu};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Menu upsert request body; replaces the entry for `(day, mealType)`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMenuRequest {
    pub day: MenuDay,
    pub meal_type: MealType,
    pub items: Vec<String>,
}

/// List the published menu.
#[utoipa::path(
    get,
    path = "/api/v1/mess-menu",
    responses(
        (status = 200, description = "Published menu entries", body = [MessMenu]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["mess-menu"],
    operation_id = "listMessMenu"
)]
#[get("/mess-menu")]
pub async fn list_mess_menu(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MessMenu>>> {
    let identity = session.require_identity()?;
    let menu = state.mess_menu.list(&identity).await?;
    Ok(web::Json(menu))
}

/// Publish or replace a menu entry.
#[utoipa::path(
    post,
    path = "/api/v1/mess-menu",
    request_body = UpsertMenuRequest,
    responses(
        (status = 200, description = "Published entry", body = MessMenu),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["mess-menu"],
    operation_id = "upsertMessMenu"
)]
#[post("/mess-menu")]
pub async fn upsert_mess_menu(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpsertMenuRequest>,
) -> ApiResult<web::Json<MessMenu>> {
    let identity = session.require_identity()?;
    let payload = payload.into_inner();
    let menu = state
        .mess_menu
        .upsert(&identity, payload.day, payload.meal_type, payload.items)
        .await?;
    Ok(web::Json(menu))
}

/// Delete a menu entry.
#[utoipa::path(
    delete,
    path = "/api/v1/mess-menu/{menu_id}",
    params(("menu_id" = Uuid, Path, description = "Menu entry identifier")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Entry not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["mess-menu"],
    operation_id = "deleteMessMenu"
)]
#[delete("/mess-menu/{menu_id}")]
pub async fn delete_mess_menu(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    state
        .mess_menu
        .delete(&identity, &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
