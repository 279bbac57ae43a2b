//! Borrow, return and late fee endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{borrow::CirculationRequest, LateFee, RawBookId},
    AppState,
};

use super::ActionResponse;

/// Borrow response with the computed due date
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub success: bool,
    pub message: String,
    /// Borrow record ID
    pub borrow_id: i32,
    pub due_date: DateTime<Utc>,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "loans",
    request_body = CirculationRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 400, description = "Invalid patron or book id"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "No copy available or borrow limit reached")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    Json(request): Json<CirculationRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let (record, message) = state
        .services
        .loans
        .borrow_book(&request.patron_id, request.book_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            success: true,
            message,
            borrow_id: record.id,
            due_date: record.due_date,
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/returns",
    tag = "loans",
    request_body = CirculationRequest,
    responses(
        (status = 200, description = "Book returned", body = ActionResponse),
        (status = 404, description = "Book not found"),
        (status = 422, description = "No active borrow for this patron and book")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Json(request): Json<CirculationRequest>,
) -> AppResult<Json<ActionResponse>> {
    let message = state
        .services
        .loans
        .return_book(&request.patron_id, request.book_id)
        .await?;
    Ok(Json(ActionResponse::ok(message)))
}

/// Late fee currently owed on one loan
#[utoipa::path(
    get,
    path = "/fees/{patron_id}/{book_id}",
    tag = "loans",
    params(
        ("patron_id" = String, Path, description = "6-digit patron ID"),
        ("book_id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Fee assessment", body = LateFee)
    )
)]
pub async fn get_late_fee(
    State(state): State<AppState>,
    Path((patron_id, book_id)): Path<(String, String)>,
) -> AppResult<Json<LateFee>> {
    let fee = state
        .services
        .fees
        .calculate_late_fee(&patron_id, RawBookId::Text(book_id))
        .await?;
    Ok(Json(fee))
}
