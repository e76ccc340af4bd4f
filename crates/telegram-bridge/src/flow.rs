//! Login flow and message relay.
//!
//! Per phone number the login state is derived, not stored:
//! - unauthenticated: no pending login and Telegram reports not authorized
//! - code requested: a [`PendingAuth`] exists
//! - authenticated: Telegram reports the session authorized

use crate::error::BridgeError;
use crate::session::{Credentials, MessagingClient, PendingAuth, SessionManager};
use serde::Serialize;
use std::sync::Arc;
use telegram_client::{ClientError, Entity};
use tracing::{error, info, instrument, warn};

/// Chat every relayed message is sent to.
pub const TARGET_CHAT_ID: i64 = -5285453194;

/// Outcome of a login request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStatus {
    /// Session was already signed in, no code was requested
    Authorized,
    /// A one-time code was sent to the user's Telegram app
    CodeSent,
}

/// Drives logins and sends over a [`SessionManager`].
#[derive(Clone)]
pub struct Bridge {
    sessions: Arc<SessionManager>,
    destination: i64,
}

impl Bridge {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self {
            sessions,
            destination: TARGET_CHAT_ID,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn destination(&self) -> i64 {
        self.destination
    }

    /// Start a login, or report that the session is already signed in.
    #[instrument(skip(self, credentials))]
    pub async fn request_login(
        &self,
        phone: &str,
        credentials: &Credentials,
    ) -> Result<LoginStatus, BridgeError> {
        self.try_request_login(phone, credentials)
            .await
            .map_err(|e| {
                error!(phone = %phone, error = %e, "Login error");
                BridgeError::Auth(e.to_string())
            })
    }

    async fn try_request_login(
        &self,
        phone: &str,
        credentials: &Credentials,
    ) -> Result<LoginStatus, ClientError> {
        let client = self.sessions.get_or_create(phone, credentials).await?;

        if client.is_authorized().await? {
            info!(phone = %phone, "Session already authorized");
            return Ok(LoginStatus::Authorized);
        }

        let sent = client.send_code(phone).await?;
        self.sessions
            .insert_pending(phone, PendingAuth::new(client, sent.phone_code_hash))
            .await;

        info!(phone = %phone, "Login code sent");
        Ok(LoginStatus::CodeSent)
    }

    /// Finish a pending login with the code the user received.
    ///
    /// The pending login survives a failed attempt.
    #[instrument(skip(self, code))]
    pub async fn submit_code(&self, phone: &str, code: &str) -> Result<(), BridgeError> {
        let pending = self
            .sessions
            .pending(phone)
            .await
            .ok_or(BridgeError::NoPendingLogin)?;

        // TODO: accept the account password and finish sign-in for two-factor accounts.
        pending
            .client
            .sign_in(phone, code, &pending.phone_code_hash)
            .await
            .map_err(|e| {
                error!(phone = %phone, error = %e, "Submit code error");
                BridgeError::Auth(e.to_string())
            })?;

        self.sessions.remove_pending(phone).await;

        info!(phone = %phone, "Signed in");
        Ok(())
    }

    /// Send `text` verbatim to the destination chat from `phone`'s session.
    #[instrument(skip(self, credentials, text))]
    pub async fn send_message(
        &self,
        phone: &str,
        credentials: &Credentials,
        text: &str,
    ) -> Result<(), BridgeError> {
        let client = self
            .sessions
            .get_or_create(phone, credentials)
            .await
            .map_err(|e| send_error(phone, e))?;

        if !client
            .is_authorized()
            .await
            .map_err(|e| send_error(phone, e))?
        {
            warn!(phone = %phone, "Send attempted on unauthorized session");
            return Err(BridgeError::NotAuthorized);
        }

        let entity = self.resolve_destination(phone, client.as_ref()).await?;

        client
            .send_message(&entity, text)
            .await
            .map_err(|e| send_error(phone, e))?;

        info!(phone = %phone, chat_id = self.destination, "Message sent");
        Ok(())
    }

    /// Resolve the destination, syncing dialogs and retrying once on a cache miss.
    async fn resolve_destination(
        &self,
        phone: &str,
        client: &dyn MessagingClient,
    ) -> Result<Entity, BridgeError> {
        match client.get_entity(self.destination).await {
            Ok(entity) => return Ok(entity),
            Err(e) => {
                warn!(chat_id = self.destination, error = %e, "Entity not found, syncing dialogs");
            }
        }

        client
            .get_dialogs()
            .await
            .map_err(|e| send_error(phone, e))?;

        client.get_entity(self.destination).await.map_err(|e| {
            error!(chat_id = self.destination, error = %e, "Could not resolve chat");
            BridgeError::DestinationUnresolved(self.destination)
        })
    }
}

fn send_error(phone: &str, e: ClientError) -> BridgeError {
    error!(phone = %phone, error = %e, "Send error");
    BridgeError::Collaborator(e.to_string())
}
