//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use depot_core::UploadError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response body, `{"error": "..."}` on every failure path.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Human-readable error message.
    pub error: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upload error: {0}")]
    Upload(#[from] UploadError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upload(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Self::Upload(e) if !e.is_not_found() => {
                tracing::error!(error = %e, "upload operation failed");
                "Internal server error".to_string()
            }
            Self::Upload(_) => "File not found".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorRes { error: message })).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
