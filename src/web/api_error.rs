use crate::core::safety::SafetyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by every handler.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, ApiError>`.
#[derive(Debug)]
pub struct ApiError(pub SafetyError);

impl From<SafetyError> for ApiError {
    fn from(err: SafetyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SafetyError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SafetyError::Unauthorized => (StatusCode::FORBIDDEN, "Geen toegang".to_string()),
            SafetyError::NotFound(_) => (StatusCode::NOT_FOUND, "Alert niet gevonden".to_string()),
            SafetyError::AlreadyResolved(_) => (
                StatusCode::CONFLICT,
                "Alert is al opgelost".to_string(),
            ),
            SafetyError::StorageError(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Er is iets misgegaan".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
