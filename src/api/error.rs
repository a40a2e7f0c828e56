//! Maps [`Error`] onto HTTP responses.
//!
//! Every error body is `{"error": "<message>"}`. Store failures are logged
//! here and reported with a fixed message rather than the driver's text.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

impl Error {
    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCommand { .. } | Self::InvalidState { .. } | Self::InvalidTimestamp => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Config { .. }
            | Self::Database(_)
            | Self::CorruptRecord { .. }
            | Self::StateLock(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Database(e) => {
                error!("Store unavailable: {}", e);
                "store unavailable".to_string()
            }
            e if status.is_server_error() => {
                error!("Request failed: {}", e);
                "internal error".to_string()
            }
            e => e.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
