//! HTTP request handlers.

use super::types::{
    HealthResponse, LoginRequest, LoginResponse, SendRequest, SendResponse, SubmitCodeRequest,
    SubmitCodeResponse,
};
use super::AppState;
use crate::error::BridgeError;
use crate::flow::LoginStatus;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Accept any body; one that is not valid JSON counts as having no fields.
fn body_or_default<T: DeserializeOwned + Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable request body");
            T::default()
        }
    }
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let sessions = state.bridge.sessions();

    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: sessions.session_count().await,
        pending_logins: sessions.pending_count().await,
        oldest_pending_secs: sessions
            .oldest_pending()
            .await
            .map(|requested_at| (Utc::now() - requested_at).num_seconds()),
        target_chat_id: state.bridge.destination(),
        gateway_healthy: sessions.health_check().await,
    })
}

/// Start a login, sending a one-time code unless already signed in.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, BridgeError> {
    let (phone, credentials) = body_or_default(payload).validate()?;
    info!(phone = %phone, "Login request received");

    let status = state.bridge.request_login(&phone, &credentials).await?;

    let message = match status {
        LoginStatus::Authorized => "Already logged in!",
        LoginStatus::CodeSent => "OTP Sent to Telegram app.",
    };

    Ok(Json(LoginResponse {
        success: true,
        status,
        message: message.to_string(),
    }))
}

/// Complete a pending login with the one-time code.
pub async fn submit_code(
    State(state): State<AppState>,
    payload: Result<Json<SubmitCodeRequest>, JsonRejection>,
) -> Result<Json<SubmitCodeResponse>, BridgeError> {
    let (phone, code) = body_or_default(payload).validate()?;
    info!(phone = %phone, "Code submission received");

    state.bridge.submit_code(&phone, &code).await?;

    Ok(Json(SubmitCodeResponse {
        success: true,
        message: "Successfully Logged In!".to_string(),
    }))
}

/// Relay a message to the destination chat.
pub async fn send(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, BridgeError> {
    let params = body_or_default(payload).validate()?;

    state
        .bridge
        .send_message(&params.phone, &params.credentials, &params.text)
        .await?;

    Ok(Json(SendResponse { success: true }))
}
