//! Fee-payment API handlers.
//!
//! ```text
//! GET /api/v1/payments
//! POST /api/v1/payments {"studentId":"...","amount":4500.0,"month":"July","year":"2026","paymentType":"hostel_fee","dueDate":"2026-07-15"}
//! PUT /api/v1/payments/{payment_id}/mark-paid
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::records::{Payment, PaymentType};
use crate::domain::{AccountId, Error, NewPayment};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// New-payment request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub student_id: Uuid,
    pub amount: f64,
    pub month: String,
    pub year: String,
    pub payment_type: PaymentType,
    pub due_date: NaiveDate,
}

/// List payments visible to the caller.
///
/// Admins see every record; students only their own.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    responses(
        (status = 200, description = "Visible payments", body = [Payment]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Payment>>> {
    let identity = session.require_identity()?;
    let payments = state.payments.list(&identity).await?;
    Ok(web::Json(payments))
}

/// Record a fee due from a student.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Student not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePaymentRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let payload = payload.into_inner();
    let payment = state
        .payments
        .create(
            &identity,
            NewPayment {
                student_id: AccountId::from(payload.student_id),
                amount: payload.amount,
                month: payload.month,
                year: payload.year,
                payment_type: payload.payment_type,
                due_date: payload.due_date,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(payment))
}

/// Mark a payment as settled.
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}/mark-paid",
    params(("payment_id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Updated payment", body = Payment),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Payment not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["payments"],
    operation_id = "markPaymentPaid"
)]
#[put("/payments/{payment_id}/mark-paid")]
pub async fn mark_payment_paid(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Payment>> {
    let identity = session.require_identity()?;
    let payment = state
        .payments
        .mark_paid(&identity, &path.into_inner())
        .await?;
    Ok(web::Json(payment))
}
