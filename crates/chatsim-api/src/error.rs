//! Error types for the chat API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chatsim_core::EngineError;

/// Errors that can occur in the chat API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A path timestamp was not a positive integer.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The request body was malformed or missing a required field.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// No route matches the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// The engine refused the operation.
    #[error("{source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidTimestamp(_)
            | Self::InvalidBody(_)
            | Self::Engine {
                source: EngineError::EmptyText,
            } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Engine {
                source: EngineError::Store { .. },
            } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
