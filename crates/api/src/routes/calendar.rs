//! Calendar routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{Datelike, Local};
use serde::Deserialize;

use carpool_core::query::QueryService;

use crate::{AppState, response::domain_error_response};

/// Creates the calendar routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/calendar", get(calendar_month))
}

/// Query parameters for a calendar month. Missing values mean the current month.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// Calendar year.
    pub year: Option<i32>,
    /// Month, 1-12.
    pub month: Option<u32>,
}

/// GET `/api/calendar` - Six-week grid of trip counts.
async fn calendar_month(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> impl IntoResponse {
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    match QueryService::calendar_month(&*state.read().await, year, month, today) {
        Ok(calendar) => Json(calendar).into_response(),
        Err(e) => domain_error_response(e),
    }
}
