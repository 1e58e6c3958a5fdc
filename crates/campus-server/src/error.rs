//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`campus_core::Error`] so that route
//! handlers can return `Result<T, campus_core::Error>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: campus_core::Error,
}

impl AppError {
    pub fn new(inner: campus_core::Error) -> Self {
        Self { inner }
    }
}

impl From<campus_core::Error> for AppError {
    fn from(e: campus_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            campus_core::Error::NotFound { .. } => "not_found",
            campus_core::Error::InvalidFileName(_) => "invalid_file_name",
            campus_core::Error::Validation(_) => "validation_error",
            campus_core::Error::Database { .. } => "database_error",
            campus_core::Error::Io { .. } => "io_error",
            campus_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
