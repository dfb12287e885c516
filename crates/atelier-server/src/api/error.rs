//! Mapping core errors onto HTTP responses

use atelier_core::AtelierError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// 425 Too Early: the upstream has not produced the file yet
pub fn too_early() -> StatusCode {
    StatusCode::from_u16(425).unwrap_or(StatusCode::ACCEPTED)
}

/// Core error carried to the HTTP boundary
#[derive(Debug)]
pub struct ApiError(pub AtelierError);

impl From<AtelierError> for ApiError {
    fn from(err: AtelierError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AtelierError::Validation(_) => StatusCode::BAD_REQUEST,
            // Not shared or not rendered yet
            err @ AtelierError::UpstreamUnavailable { .. }
                if matches!(err.upstream_status(), Some(403 | 404 | 409 | 425)) =>
            {
                too_early()
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "Upstream call failed");
        }

        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
