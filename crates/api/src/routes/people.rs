//! People and rate routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use serde::Deserialize;
use tracing::info;

use carpool_core::model::LedgerService;
use carpool_shared::types::{CarId, PersonId};

use super::AmountInput;
use crate::{AppState, response::domain_error_response};

/// Creates the people routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/people", post(create_person))
        .route("/people/{person_id}/rates/{car_id}", put(set_rate))
}

/// Request body for adding a person.
#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Request body for setting a per-trip rate.
#[derive(Debug, Deserialize)]
pub struct SetRateRequest {
    /// Amount charged per trip as a passenger.
    #[serde(default)]
    pub rate: Option<AmountInput>,
}

/// POST `/api/people` - Add a person.
async fn create_person(
    State(state): State<AppState>,
    Json(payload): Json<CreatePersonRequest>,
) -> impl IntoResponse {
    match state
        .mutate(|s| LedgerService::add_person(s, &payload.name))
        .await
    {
        Ok(person) => {
            info!(person_id = %person.id, "Person added");
            (StatusCode::CREATED, Json(person)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// PUT `/api/people/{person_id}/rates/{car_id}` - Set a person's rate for a car.
async fn set_rate(
    State(state): State<AppState>,
    Path((person_id, car_id)): Path<(String, String)>,
    Json(payload): Json<SetRateRequest>,
) -> impl IntoResponse {
    let rate = match AmountInput::parse(payload.rate.as_ref()) {
        Ok(rate) => rate,
        Err(e) => return domain_error_response(e),
    };
    let person_id = PersonId::new(person_id);

    match state
        .mutate(|s| LedgerService::set_rate(s, &person_id, CarId::new(car_id), rate))
        .await
    {
        Ok(person) => (StatusCode::OK, Json(person)).into_response(),
        Err(e) => domain_error_response(e),
    }
}
