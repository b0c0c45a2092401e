//! Trip routes.

use std::collections::BTreeMap;
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

use carpool_core::model::{LedgerService, NewTrip};
use carpool_core::query::{QueryService, TripFilter, TripRow};
use carpool_shared::types::{CarId, PersonId, TripId};

use super::non_blank;
use crate::{AppState, response::domain_error_response};

/// Creates the trip routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/by-date", get(trips_by_date))
        .route("/trips/{trip_id}", delete(delete_trip))
}

/// Request body for recording a trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    /// ISO date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Car used.
    #[serde(default)]
    pub car_id: String,
    /// Person driving.
    #[serde(default)]
    pub driver_id: String,
    /// People riding along.
    #[serde(default)]
    pub passenger_ids: Vec<String>,
}

impl From<CreateTripRequest> for NewTrip {
    fn from(req: CreateTripRequest) -> Self {
        Self {
            date: req.date,
            car_id: CarId::new(req.car_id),
            driver_id: PersonId::new(req.driver_id),
            passenger_ids: req.passenger_ids.into_iter().map(PersonId::new).collect(),
        }
    }
}

/// Query parameters for listing trips.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTripsQuery {
    /// Restrict to one car.
    pub car_id: Option<String>,
}

/// POST `/api/trips` - Record a trip.
async fn create_trip(
    State(state): State<AppState>,
    Json(payload): Json<CreateTripRequest>,
) -> impl IntoResponse {
    let input = NewTrip::from(payload);
    match state.mutate(|s| LedgerService::add_trip(s, input)).await {
        Ok(trip) => {
            info!(
                trip_id = %trip.id,
                car_id = %trip.car_id,
                passengers = trip.passenger_ids.len(),
                "Trip recorded"
            );
            (StatusCode::CREATED, Json(trip)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// GET `/api/trips` - Trips, newest first.
async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<ListTripsQuery>,
) -> Json<Vec<TripRow>> {
    let filter = match non_blank(query.car_id) {
        Some(car_id) => TripFilter::new().for_car(CarId::new(car_id)),
        None => TripFilter::new(),
    };
    Json(QueryService::trip_rows(&*state.read().await, &filter))
}

/// GET `/api/trips/by-date` - Trip count per date.
async fn trips_by_date(State(state): State<AppState>) -> Json<BTreeMap<String, usize>> {
    Json(QueryService::trips_by_date(&*state.read().await))
}

/// DELETE `/api/trips/{trip_id}` - Remove a trip.
async fn delete_trip(State(state): State<AppState>, Path(trip_id): Path<String>) -> StatusCode {
    let trip_id = TripId::new(trip_id);
    let Ok(removed) = state
        .mutate(|s| Ok::<_, Infallible>(LedgerService::delete_trip(s, &trip_id)))
        .await;
    if removed {
        info!(trip_id = %trip_id, "Trip deleted");
    }
    StatusCode::NO_CONTENT
}
