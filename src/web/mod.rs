//! HTTP surface for the tracker board.
//!
//! Every body is either `{"data": ...}` or `{"error": ..., "code": ...}`. The
//! role comes from the `x-tracker-role` header and is trusted as sent.

pub mod handlers;
pub mod router;
pub mod state;

use crate::core::TrackerError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub use router::build_router;
pub use state::AppState;

pub const ROLE_HEADER: &str = "x-tracker-role";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Tracker(TrackerError),
    Input(String),
}

impl From<TrackerError> for WebError {
    fn from(err: TrackerError) -> Self {
        WebError::Tracker(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Tracker(TrackerError::Validation(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                "validation_error",
            ),
            WebError::Tracker(err @ TrackerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string(), "not_found")
            }
            WebError::Tracker(TrackerError::PermissionDenied(msg)) => {
                (StatusCode::FORBIDDEN, msg, "permission_denied")
            }
            WebError::Tracker(TrackerError::Storage(msg)) => {
                tracing::error!(error = %msg, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage operation failed".to_string(),
                    "storage_error",
                )
            }
            WebError::Input(msg) => (StatusCode::BAD_REQUEST, msg, "input_error"),
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::WebError;
    use crate::core::TrackerError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn tracker_errors_map_to_http_status() {
        let cases = [
            (TrackerError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (TrackerError::not_found("x"), StatusCode::NOT_FOUND),
            (
                TrackerError::PermissionDenied("x".into()),
                StatusCode::FORBIDDEN,
            ),
            (TrackerError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(WebError::from(err).into_response().status(), expected);
        }
        assert_eq!(
            WebError::Input("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
