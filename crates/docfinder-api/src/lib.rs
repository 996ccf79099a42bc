use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docfinder_core::{FieldErrors, NON_FIELD_ERRORS};
use docfinder_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of every non-validation error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors returned by HTTP handlers.
///
/// Validation failures serialize as `{field: [messages]}`; every other
/// variant serializes as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, msg))
    }
    pub fn non_field(msg: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, msg)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::AlreadyExists { .. } => ApiError::non_field(err.to_string()),
            StorageError::UniqueViolation { message, .. } => ApiError::non_field(message),
            StorageError::ForeignKeyViolation { message } => ApiError::BadRequest(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "internal error while handling request");
                (
                    status,
                    Json(ErrorBody {
                        error: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::PayloadTooLarge(message) => {
                (status, Json(ErrorBody { error: message })).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors_render_field_map() {
        let mut errors = FieldErrors::new();
        errors.add("phone_number", "bad");
        errors.add("email", "required");
        let resp = ApiError::from(errors).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = body_json(resp).await;
        assert_eq!(body["phone_number"][0], "bad");
        assert_eq!(body["email"][0], "required");
    }

    #[tokio::test]
    async fn test_not_found_renders_error_object() {
        let resp = ApiError::not_found("Doctor not found").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, serde_json::json!({"error": "Doctor not found"}));
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let resp = ApiError::internal("store poisoned").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_storage_errors_map_to_http() {
        let resp = ApiError::from(StorageError::not_found("Doctor", "42")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Doctor not found: 42");

        let resp = ApiError::from(StorageError::unique_violation("appointment_slot", "taken"))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["non_field_errors"][0], "taken");
    }

    #[test]
    fn test_non_field_error_key() {
        match ApiError::non_field("slot taken") {
            ApiError::Validation(errors) => assert!(errors.contains("non_field_errors")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
