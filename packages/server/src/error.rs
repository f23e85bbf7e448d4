use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Missing required fields")]
    pub error: String,
    /// Extra detail, present only on importer failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request, rejected before any side effect.
    Validation(String),
    /// No `Authorization` header on the request.
    TokenMissing,
    /// Authorization header present but the identity could not be resolved.
    TokenInvalid,
    PermissionDenied,
    NotFound(String),
    Conflict(String),
    /// The import request died outside the per-record loop.
    ImportFailed(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Missing authorization header"),
            ),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, ErrorBody::new("Unauthorized")),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody::new("Insufficient permissions"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new(msg)),
            AppError::ImportFailed(detail) => {
                tracing::error!("Problem import failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Failed to process problem import".into(),
                        message: Some(detail),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("An unexpected error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
