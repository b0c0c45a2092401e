//! Car routes.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use serde::Deserialize;
use tracing::info;

use carpool_core::model::LedgerService;
use carpool_shared::types::CarId;

use crate::{AppState, response::domain_error_response};

/// Creates the car routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", post(create_car))
        .route("/cars/{car_id}", delete(delete_car))
}

/// Request body for adding a car.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// One of petrol, diesel, cng, electric, hybrid.
    #[serde(default)]
    pub fuel_type: String,
}

/// POST `/api/cars` - Add a car.
async fn create_car(
    State(state): State<AppState>,
    Json(payload): Json<CreateCarRequest>,
) -> impl IntoResponse {
    match state
        .mutate(|s| LedgerService::add_car(s, &payload.name, &payload.fuel_type))
        .await
    {
        Ok(car) => {
            info!(car_id = %car.id, fuel_type = %car.fuel_type, "Car added");
            (StatusCode::CREATED, Json(car)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// DELETE `/api/cars/{car_id}` - Remove a car with its trips and rates.
async fn delete_car(State(state): State<AppState>, Path(car_id): Path<String>) -> StatusCode {
    let car_id = CarId::new(car_id);
    let Ok(removed) = state
        .mutate(|s| Ok::<_, Infallible>(LedgerService::delete_car(s, &car_id)))
        .await;
    if removed {
        info!(car_id = %car_id, "Car deleted");
    }
    StatusCode::NO_CONTENT
}
