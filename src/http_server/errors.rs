//! # API Errors
//!
//! Error types for the HTTP layer and their mapping to status codes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::student::{FieldError, ServiceError, ValidationErrors};

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Payload violated field constraints
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Body was not a JSON object of the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path id was not a positive integer
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Required query parameter absent or blank
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    /// Referenced student does not exist
    #[error("Student not found with id: {0}")]
    NotFound(i64),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store failure or a crashed worker. The detail is logged, not returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(id) => ApiError::NotFound(id),
            ServiceError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidId(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let code = err.status_code().as_u16();
        match err {
            ApiError::Validation(errors) => Self {
                error: "Validation failed".to_string(),
                code,
                details: errors.errors().to_vec(),
            },
            ApiError::Internal(_) => Self {
                error: "Internal server error".to_string(),
                code,
                details: Vec::new(),
            },
            other => Self {
                error: other.to_string(),
                code,
                details: Vec::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(detail) = &self {
            error!(%detail, "request failed");
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
