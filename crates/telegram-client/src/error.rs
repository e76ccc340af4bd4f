//! Telegram gateway client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the gateway. `message` is shown verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// Whether the gateway could not be reached at all.
    pub fn is_transport(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_connect(),
            _ => false,
        }
    }
}
