//! Patron endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::PatronStatusReport, AppState};

/// Patron status report: active loans, fees owed and history
#[utoipa::path(
    get,
    path = "/patrons/{patron_id}/status",
    tag = "patrons",
    params(("patron_id" = String, Path, description = "6-digit patron ID")),
    responses(
        (
            status = 200,
            description = "Status report (carries `error` for malformed ids)",
            body = PatronStatusReport
        )
    )
)]
pub async fn get_status_report(
    State(state): State<AppState>,
    Path(patron_id): Path<String>,
) -> AppResult<Json<PatronStatusReport>> {
    let report = state.services.patrons.status_report(&patron_id).await?;
    Ok(Json(report))
}
