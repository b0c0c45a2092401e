//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use carpool_core::model::DomainError;
use carpool_shared::AppError;

/// Renders an error as `{ "error": <code>, "message": <text> }`.
///
/// Server-side failures are logged and their message is not exposed.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message,
        })),
    )
        .into_response()
}

/// Renders a domain rejection as `{ "error", "message", "code" }`.
///
/// `code` is the domain's own identifier, e.g. `INVALID_AMOUNT`.
pub fn domain_error_response(err: DomainError) -> Response {
    let code = err.error_code();
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    let err = AppError::from(err);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
            "code": code,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use carpool_shared::types::PersonId;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = error_response(AppError::Validation("name must not be blank".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_maps_to_500() {
        let response = error_response(AppError::Storage("disk full".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = error_response(AppError::NotFound("Person p1".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_domain_error_carries_code() {
        let response = domain_error_response(DomainError::invalid_amount("abc"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["code"], "INVALID_AMOUNT");
        assert!(json["message"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_person_not_found_is_404_with_code() {
        let response =
            domain_error_response(DomainError::PersonNotFound(PersonId::new("p-gone")));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["code"], "PERSON_NOT_FOUND");
    }
}
