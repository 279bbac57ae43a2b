//! API handlers for Shelfmark REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod patrons;
pub mod payments;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Acknowledgement returned by state-changing endpoints
#[derive(Serialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/books", get(books::list_books).post(books::add_book))
        .route("/books/search", get(books::search_books))
        .route("/books/:id", get(books::get_book))
        // Circulation
        .route("/borrows", post(loans::borrow_book))
        .route("/returns", post(loans::return_book))
        .route("/fees/:patron_id/:book_id", get(loans::get_late_fee))
        // Patrons
        .route("/patrons/:patron_id/status", get(patrons::get_status_report))
        // Payments
        .route("/payments", post(payments::pay_late_fees))
        .route("/refunds", post(payments::refund_payment))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
