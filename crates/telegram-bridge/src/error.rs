//! Error types for the bridge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Bridge error types.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Missing or malformed request fields. Raised before the gateway is contacted.
    #[error("{0}")]
    Validation(String),

    #[error("No pending login for this phone. Restart login.")]
    NoPendingLogin,

    #[error("Not Authorized. Please Login first.")]
    NotAuthorized,

    #[error("Could not find Chat {0}. Make sure you are a member.")]
    DestinationUnresolved(i64),

    /// Telegram rejected credentials, code or session state.
    #[error("{0}")]
    Auth(String),

    /// Any other gateway failure.
    #[error("{0}")]
    Collaborator(String),
}

impl BridgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            BridgeError::NoPendingLogin => StatusCode::BAD_REQUEST,
            BridgeError::NotAuthorized => StatusCode::UNAUTHORIZED,
            BridgeError::DestinationUnresolved(_) => StatusCode::BAD_REQUEST,
            BridgeError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::Collaborator(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
