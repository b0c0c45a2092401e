//! Adjustment routes.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use serde::Deserialize;
use tracing::info;

use carpool_core::model::{LedgerService, NewAdjustment};
use carpool_core::query::{AdjustmentRow, DEFAULT_ADJUSTMENT_LIMIT, QueryService};
use carpool_shared::types::{AdjustmentId, CarId, PersonId};

use super::AmountInput;
use crate::{AppState, response::domain_error_response};

/// Creates the adjustment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/adjustments", get(list_adjustments).post(create_adjustment))
        .route("/adjustments/{adjustment_id}", delete(delete_adjustment))
}

/// Request body for recording an adjustment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdjustmentRequest {
    /// Car whose pool is adjusted.
    #[serde(default)]
    pub car_id: String,
    /// Person whose balance is adjusted.
    #[serde(default)]
    pub person_id: String,
    /// Signed amount; negative is a credit.
    #[serde(default)]
    pub amount: Option<AmountInput>,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Query parameters for listing adjustments.
#[derive(Debug, Default, Deserialize)]
pub struct ListAdjustmentsQuery {
    /// Maximum number of entries (default 20).
    pub limit: Option<usize>,
}

/// POST `/api/adjustments` - Record an adjustment.
async fn create_adjustment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdjustmentRequest>,
) -> impl IntoResponse {
    let amount = match AmountInput::parse(payload.amount.as_ref()) {
        Ok(amount) => amount,
        Err(e) => return domain_error_response(e),
    };
    let input = NewAdjustment {
        car_id: CarId::new(payload.car_id),
        person_id: PersonId::new(payload.person_id),
        amount,
        note: payload.note,
    };

    match state
        .mutate(|s| LedgerService::add_adjustment(s, input))
        .await
    {
        Ok(adjustment) => {
            info!(
                adjustment_id = %adjustment.id,
                car_id = %adjustment.car_id,
                person_id = %adjustment.person_id,
                amount = %adjustment.amount,
                "Adjustment recorded"
            );
            (StatusCode::CREATED, Json(adjustment)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// GET `/api/adjustments` - Most recent adjustments first.
async fn list_adjustments(
    State(state): State<AppState>,
    Query(query): Query<ListAdjustmentsQuery>,
) -> Json<Vec<AdjustmentRow>> {
    let limit = query.limit.unwrap_or(DEFAULT_ADJUSTMENT_LIMIT);
    Json(QueryService::adjustment_rows(&*state.read().await, limit))
}

/// DELETE `/api/adjustments/{adjustment_id}` - Remove an adjustment.
async fn delete_adjustment(
    State(state): State<AppState>,
    Path(adjustment_id): Path<String>,
) -> StatusCode {
    let adjustment_id = AdjustmentId::new(adjustment_id);
    let Ok(removed) = state
        .mutate(|s| Ok::<_, Infallible>(LedgerService::delete_adjustment(s, &adjustment_id)))
        .await;
    if removed {
        info!(adjustment_id = %adjustment_id, "Adjustment deleted");
    }
    StatusCode::NO_CONTENT
}
