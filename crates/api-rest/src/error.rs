//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use prontuario_core::{FieldErrors, RecordError, RecordKind, ShapeError, UnknownKind};
use prontuario_uuid::UuidError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// Field name → reason, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("{kind} payload failed validation")]
    Invalid { kind: RecordKind, errors: FieldErrors },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, fields) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            ApiError::Shape(err) => {
                tracing::warn!(subject = err.subject, field = err.field, "malformed payload");
                (StatusCode::BAD_REQUEST, "MALFORMED_PAYLOAD", None)
            }
            ApiError::Invalid { kind, errors } => {
                tracing::debug!(%kind, fields = errors.len(), "validation failed");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_FAILED",
                    Some(errors),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Shape(e) => ApiError::Shape(e),
            RecordError::Invalid { kind, errors } => ApiError::Invalid { kind, errors },
        }
    }
}

impl From<UnknownKind> for ApiError {
    fn from(err: UnknownKind) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<UuidError> for ApiError {
    fn from(err: UuidError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
