//! Balance routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use carpool_core::balance::{BalanceEngine, BalanceMatrix, CarBalances};
use carpool_core::model::CarpoolState;
use carpool_core::query::{BalanceFilter, BalanceRow, QueryService};
use carpool_shared::types::PersonId;

use super::non_blank;
use crate::AppState;

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/balances", get(list_balances))
        .route("/balances/matrix", get(balance_matrix))
}

/// Query parameters for listing balances.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBalancesQuery {
    /// Restrict to one person.
    pub person_id: Option<String>,
}

/// Dense balance matrix, every car by every person.
#[derive(Debug, Serialize)]
pub struct BalanceMatrixResponse {
    /// One entry per car, people in collection order.
    pub cars: Vec<CarBalances>,
}

/// GET `/api/balances` - Outstanding balances, largest first.
async fn list_balances(
    State(state): State<AppState>,
    Query(query): Query<ListBalancesQuery>,
) -> Json<Vec<BalanceRow>> {
    let filter = match non_blank(query.person_id) {
        Some(person_id) => BalanceFilter::new().for_person(PersonId::new(person_id)),
        None => BalanceFilter::new(),
    };
    let state = state.read().await;
    let matrix = checked_matrix(&state);
    Json(QueryService::balance_rows_of(&state, &matrix, &filter))
}

/// GET `/api/balances/matrix` - Every (car, person) balance, zeros included.
async fn balance_matrix(State(state): State<AppState>) -> Json<BalanceMatrixResponse> {
    let matrix = checked_matrix(&*state.read().await);
    Json(BalanceMatrixResponse {
        cars: matrix.to_nested(),
    })
}

/// Computes balances, warning when stored amounts overflowed a cell.
fn checked_matrix(state: &CarpoolState) -> BalanceMatrix {
    let matrix = BalanceEngine::compute(state);
    if matrix.is_saturated() {
        warn!("Balance overflowed the decimal range and was clamped");
    }
    matrix
}
