//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, patrons, payments};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfmark API",
        version = "0.3.0",
        description = "Library catalog, circulation and late fee REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::add_book,
        books::search_books,
        // Loans
        loans::borrow_book,
        loans::return_book,
        loans::get_late_fee,
        // Patrons
        patrons::get_status_report,
        // Payments
        payments::pay_late_fees,
        payments::refund_payment,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::NewBook,
            books::AddBookResponse,
            // Loans
            crate::models::borrow::CirculationRequest,
            crate::models::borrow::BorrowHistoryEntry,
            crate::models::fee::LateFee,
            crate::models::fee::FeeStatus,
            loans::BorrowResponse,
            // Patrons
            crate::models::patron::PatronStatusReport,
            crate::models::patron::CurrentLoan,
            crate::models::patron::LoanCounts,
            // Payments
            crate::models::payment::PayFeesRequest,
            crate::models::payment::RefundRequest,
            payments::PaymentResponseBody,
            // Common
            super::ActionResponse,
            health::HealthResponse,
            crate::config::LoanPolicy,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "loans", description = "Borrowing, returns and late fees"),
        (name = "patrons", description = "Patron status"),
        (name = "payments", description = "Late fee payments and refunds")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
