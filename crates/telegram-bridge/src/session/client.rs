//! Messaging client seam and its gateway-backed implementation.

use super::Credentials;
use async_trait::async_trait;
use std::sync::Arc;
use telegram_client::{ClientError, Entity, GatewayClient, GatewaySession, SentCode};

/// One connection to Telegram for one phone number.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Whether the connection is believed to be live.
    fn is_connected(&self) -> bool;

    async fn connect(&self) -> Result<(), ClientError>;

    /// Ask Telegram whether this session is signed in. Never cached.
    async fn is_authorized(&self) -> Result<bool, ClientError>;

    async fn send_code(&self, phone: &str) -> Result<SentCode, ClientError>;

    async fn sign_in(
        &self,
        phone: &str,
        code: &str,
        phone_code_hash: &str,
    ) -> Result<(), ClientError>;

    /// Resolve a peer id from the session's entity cache.
    async fn get_entity(&self, id: i64) -> Result<Entity, ClientError>;

    /// Refresh the dialog list (and with it the entity cache).
    async fn get_dialogs(&self) -> Result<usize, ClientError>;

    async fn send_message(&self, entity: &Entity, text: &str) -> Result<(), ClientError>;
}

/// Builds unconnected clients for a persisted session.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    fn create(&self, session: &str, credentials: &Credentials) -> Arc<dyn MessagingClient>;

    /// Whether the messaging backend is reachable.
    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl MessagingClient for GatewaySession {
    fn is_connected(&self) -> bool {
        GatewaySession::is_connected(self)
    }

    async fn connect(&self) -> Result<(), ClientError> {
        GatewaySession::connect(self).await
    }

    async fn is_authorized(&self) -> Result<bool, ClientError> {
        GatewaySession::is_authorized(self).await
    }

    async fn send_code(&self, phone: &str) -> Result<SentCode, ClientError> {
        GatewaySession::send_code(self, phone).await
    }

    async fn sign_in(
        &self,
        phone: &str,
        code: &str,
        phone_code_hash: &str,
    ) -> Result<(), ClientError> {
        GatewaySession::sign_in(self, phone, code, phone_code_hash).await
    }

    async fn get_entity(&self, id: i64) -> Result<Entity, ClientError> {
        GatewaySession::get_entity(self, id).await
    }

    async fn get_dialogs(&self) -> Result<usize, ClientError> {
        GatewaySession::get_dialogs(self).await
    }

    async fn send_message(&self, entity: &Entity, text: &str) -> Result<(), ClientError> {
        GatewaySession::send_message(self, entity, text)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ClientFactory for GatewayClient {
    fn create(&self, session: &str, credentials: &Credentials) -> Arc<dyn MessagingClient> {
        Arc::new(self.session(
            session,
            credentials.api_id,
            credentials.api_hash.clone(),
        ))
    }

    async fn health_check(&self) -> bool {
        GatewayClient::health_check(self).await
    }
}
