//! Telegram gateway API types.

use serde::{Deserialize, Serialize};

/// Body of a connect request.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectRequest<'a> {
    pub api_id: i32,
    pub api_hash: &'a str,
}

/// Authorization state of a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationStatus {
    pub authorized: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendCodeRequest<'a> {
    pub phone: &'a str,
}

/// Result of requesting a login code.
///
/// `phone_code_hash` must be passed back together with the code on sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SentCode {
    pub phone_code_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest<'a> {
    pub phone: &'a str,
    pub code: &'a str,
    pub phone_code_hash: &'a str,
}

/// Kind of a resolved peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Chat,
    Channel,
}

/// A peer resolved by the gateway, ready to be used as a message target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub kind: EntityKind,
    #[serde(default)]
    pub title: Option<String>,
}

/// Result of a dialog sync.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogSync {
    pub count: usize,
}

/// Outgoing message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub peer: i64,
    pub text: &'a str,
}

/// Send message response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub message_id: Option<i64>,
}

/// Error body returned by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
