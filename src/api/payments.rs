//! Late fee payment endpoints

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::payment::{PayFeesRequest, RefundRequest},
    AppState,
};

use super::ActionResponse;

#[derive(Serialize, ToSchema)]
pub struct PaymentResponseBody {
    pub success: bool,
    pub transaction_id: String,
    pub amount: Decimal,
    pub message: String,
}

/// Pay the late fee owed on a loan
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = PayFeesRequest,
    responses(
        (status = 200, description = "Fee charged", body = PaymentResponseBody),
        (status = 400, description = "Invalid patron or book id"),
        (status = 422, description = "No late fees due"),
        (status = 502, description = "Gateway declined or failed")
    )
)]
pub async fn pay_late_fees(
    State(state): State<AppState>,
    Json(request): Json<PayFeesRequest>,
) -> AppResult<Json<PaymentResponseBody>> {
    let receipt = state
        .services
        .payments
        .pay_late_fees(&request.patron_id, request.book_id)
        .await?;

    Ok(Json(PaymentResponseBody {
        success: true,
        transaction_id: receipt.transaction_id,
        amount: receipt.amount,
        message: receipt.message,
    }))
}

/// Refund a late fee payment
#[utoipa::path(
    post,
    path = "/refunds",
    tag = "payments",
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund accepted", body = ActionResponse),
        (status = 400, description = "Invalid transaction id or amount"),
        (status = 502, description = "Gateway refused or failed")
    )
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    Json(request): Json<RefundRequest>,
) -> AppResult<Json<ActionResponse>> {
    let message = state
        .services
        .payments
        .refund_late_fee_payment(&request.transaction_id, request.amount)
        .await?;
    Ok(Json(ActionResponse::ok(message)))
}
