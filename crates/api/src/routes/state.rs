//! Whole-document routes.
//!
//! `PUT /api/state` accepts any JSON body. Collections that are missing or
//! not arrays load as empty; a body that is not an object is an empty state.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{error, info};

use carpool_core::model::{CarpoolState, LedgerService};
use carpool_shared::AppError;

use crate::{AppState, response::error_response};

/// Creates the state routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state).put(put_state))
        .route("/reset", post(reset))
}

/// GET `/api/state` - The full document.
async fn get_state(State(state): State<AppState>) -> Json<CarpoolState> {
    Json(state.read().await.clone())
}

/// PUT `/api/state` - Replace the document and save it.
async fn put_state(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let next = if body.is_object() {
        match serde_json::from_value::<CarpoolState>(body) {
            Ok(next) => next,
            Err(e) => {
                return error_response(AppError::Validation(format!("Invalid state: {e}")));
            }
        }
    } else {
        CarpoolState::default()
    };

    match state.replace(next).await {
        Ok(()) => {
            info!("State replaced");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to save state");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save state" })),
            )
                .into_response()
        }
    }
}

/// POST `/api/reset` - Clear every collection.
async fn reset(State(state): State<AppState>) -> StatusCode {
    let Ok(()) = state
        .mutate(|s| {
            LedgerService::reset(s);
            Ok::<_, Infallible>(())
        })
        .await;
    info!("State reset");
    StatusCode::NO_CONTENT
}
