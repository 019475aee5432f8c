//! Attachment upload and download handlers.
//!
//! ```text
//! POST /api/v1/upload-file?slot=photo&filename=me.png  (raw body)
//! GET /api/v1/download-file/{user_id}/{filename}
//! ```
//!
//! Uploads are raw request bodies; the declared file name only contributes
//! its extension, the stored name is server generated.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{AccountId, AttachmentRecord, AttachmentSlot, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters accompanying an upload.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UploadParams {
    /// Document category the upload fills.
    pub slot: AttachmentSlot,
    /// Client-declared file name; only its extension is kept.
    pub filename: String,
}

fn content_type_for(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    if lowered.ends_with(".pdf") {
        "application/pdf"
    } else if lowered.ends_with(".png") {
        "image/png"
    } else if lowered.ends_with(".jpg") || lowered.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

/// Store an uploaded document in the calling student's partition.
#[utoipa::path(
    post,
    path = "/api/v1/upload-file",
    params(UploadParams),
    request_body = Vec<u8>,
    responses(
        (status = 201, description = "Stored document record", body = AttachmentRecord),
        (status = 400, description = "Size or extension policy violation", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["attachments"],
    operation_id = "uploadFile"
)]
#[post("/upload-file")]
pub async fn upload_file(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let record = state
        .attachments
        .upload(&identity, params.slot, &params.filename, &body)
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// Download a stored document.
///
/// Students may only read their own partition; admins may read any.
#[utoipa::path(
    get,
    path = "/api/v1/download-file/{user_id}/{filename}",
    params(
        ("user_id" = Uuid, Path, description = "Owning account identifier"),
        ("filename" = String, Path, description = "Server-generated stored name")
    ),
    responses(
        (status = 200, description = "Document bytes"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Document belongs to another student", body = Error),
        (status = 404, description = "Document not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["attachments"],
    operation_id = "downloadFile"
)]
#[get("/download-file/{user_id}/{filename}")]
pub async fn download_file(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(Uuid, String)>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let (owner_id, stored_name) = path.into_inner();
    let bytes = state
        .attachments
        .fetch(&identity, &AccountId::from(owner_id), &stored_name)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&stored_name)))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{stored_name}\""),
        ))
        .body(bytes))
}
