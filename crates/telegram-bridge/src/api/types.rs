//! API request and response types.

use crate::error::BridgeError;
use crate::flow::LoginStatus;
use crate::session::Credentials;
use serde::{Deserialize, Serialize};

/// `api_id` as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Number(i64),
    Text(String),
}

impl ApiId {
    /// `None` for values that count as absent (`0`, empty string).
    fn parse(&self) -> Option<Result<i32, BridgeError>> {
        let value = match self {
            ApiId::Number(0) => return None,
            ApiId::Number(n) => *n,
            ApiId::Text(s) if s.trim().is_empty() => return None,
            ApiId::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => n,
                Err(_) => return Some(Err(invalid_api_id())),
            },
        };

        Some(i32::try_from(value).map_err(|_| invalid_api_id()))
    }
}

fn invalid_api_id() -> BridgeError {
    BridgeError::Validation("Invalid api_id".into())
}

/// Treat empty strings as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn check_phone(phone: &str) -> Result<String, BridgeError> {
    if !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(BridgeError::Validation("Invalid phone number".into()));
    }
    Ok(phone.to_string())
}

fn credentials(api_id: &ApiId, api_hash: &str) -> Result<Credentials, BridgeError> {
    // Only called once presence has been checked.
    let api_id = api_id.parse().unwrap_or_else(|| Err(invalid_api_id()))?;
    Ok(Credentials::new(api_id, api_hash))
}

/// Request to start a login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub api_id: Option<ApiId>,
    pub api_hash: Option<String>,
    pub phone: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(String, Credentials), BridgeError> {
        let missing = || BridgeError::Validation("Missing api_id, api_hash, or phone".into());

        match (
            self.api_id.as_ref().filter(|id| id.parse().is_some()),
            present(&self.api_hash),
            present(&self.phone),
        ) {
            (Some(api_id), Some(api_hash), Some(phone)) => {
                let credentials = credentials(api_id, api_hash)?;
                Ok((check_phone(phone)?, credentials))
            }
            _ => Err(missing()),
        }
    }
}

/// Response after a login request.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub status: LoginStatus,
    pub message: String,
}

/// Request to submit the one-time code.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitCodeRequest {
    pub phone: Option<String>,
    pub code: Option<String>,
}

impl SubmitCodeRequest {
    pub fn validate(&self) -> Result<(String, String), BridgeError> {
        match (present(&self.phone), present(&self.code)) {
            (Some(phone), Some(code)) => Ok((check_phone(phone)?, code.to_string())),
            _ => Err(BridgeError::Validation("Missing phone or code".into())),
        }
    }
}

/// Response after a successful code submission.
#[derive(Debug, Serialize)]
pub struct SubmitCodeResponse {
    pub success: bool,
    pub message: String,
}

/// Request to relay a message.
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    pub api_id: Option<ApiId>,
    pub api_hash: Option<String>,
    pub phone: Option<String>,
    pub text: Option<String>,
}

/// Validated send request.
#[derive(Debug)]
pub struct SendParams {
    pub phone: String,
    pub credentials: Credentials,
    pub text: String,
}

impl SendRequest {
    pub fn validate(&self) -> Result<SendParams, BridgeError> {
        match (
            self.api_id.as_ref().filter(|id| id.parse().is_some()),
            present(&self.api_hash),
            present(&self.phone),
            present(&self.text),
        ) {
            (Some(api_id), Some(api_hash), Some(phone), Some(text)) => Ok(SendParams {
                credentials: credentials(api_id, api_hash)?,
                phone: check_phone(phone)?,
                text: text.to_string(),
            }),
            _ => Err(BridgeError::Validation("Missing params".into())),
        }
    }
}

/// Response after a successful send.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
    pub pending_logins: usize,
    /// Seconds the longest-waiting login has been waiting for its code
    pub oldest_pending_secs: Option<i64>,
    pub target_chat_id: i64,
    pub gateway_healthy: bool,
}
