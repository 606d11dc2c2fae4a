//! HTTP mapping for handler errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrms_core::BootError;
use hrms_store::StoreError;
use serde_json::json;
use tracing::error;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Boot context assembly failed.
    #[error(transparent)]
    Boot(#[from] BootError),
    /// Session lookup failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The page context could not be serialized.
    #[error("render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Boot(BootError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Exception class name reported to the client.
    pub fn exc_type(&self) -> &'static str {
        match self {
            Self::Boot(BootError::PermissionDenied(_)) => "PermissionError",
            _ => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Boot(e) if e.is_user_facing() => e.to_string(),
            other => {
                error!(error = %other, "request failed");
                "Internal server error".to_string()
            }
        };
        let body = json!({
            "exc_type": self.exc_type(),
            "message": message,
        });
        (self.status(), Json(body)).into_response()
    }
}
