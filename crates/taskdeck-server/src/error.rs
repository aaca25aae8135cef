use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use taskdeck_core::ValidationError;
use taskdeck_store::StoreError;

/// Failures surfaced to API callers. Everything here is boundary
/// validation or a missing row; storage failures map to a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid id")]
    InvalidId,

    #[error("Not found")]
    NotFound,

    #[error("validation failed")]
    Validation(Vec<ValidationError>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidId => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid id" }))).into_response()
            }
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            Self::Validation(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": messages }))).into_response()
            }
            Self::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_404() {
        let api: ApiError = StoreError::NotFound("task 9".into()).into();
        assert!(matches!(api, ApiError::NotFound));
    }

    #[test]
    fn store_failure_maps_to_internal() {
        let api: ApiError = StoreError::Database("disk gone".into()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }
}
