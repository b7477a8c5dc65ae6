//! Maps domain errors onto HTTP responses.
//!
//! Every failure renders a structured `ErrorResponse` body; unclassified
//! faults are logged in full and surfaced with a redacted message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::DomainError;
use crate::models::response::ErrorResponse;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, error_details) = match &self.0 {
            DomainError::NotFound => (
                StatusCode::NOT_FOUND,
                "resource not found".to_string(),
                None,
            ),
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            DomainError::UnsupportedMedia(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            DomainError::External(msg) => {
                tracing::error!("metadata provider failure: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone(), None)
            }
            DomainError::Database(msg) => {
                tracing::error!("database failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    Some(json!({ "kind": "database" })),
                )
            }
            DomainError::Internal(msg) => {
                tracing::error!("internal failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    Some(json!({ "kind": "internal" })),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                status: false,
                error,
                error_details,
            }),
        )
            .into_response()
    }
}
