//! Telegram gateway HTTP client.

use crate::error::ClientError;
use crate::types::*;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Telegram user-API gateway.
///
/// Holds the shared connection pool. Individual user sessions are opened
/// with [`GatewayClient::session`].
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// Only connection setup is bounded by default. A call that reaches the
    /// gateway waits for its answer unless `timeout` is given.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Gateway base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the gateway is healthy.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Open a handle on the persisted session `name`.
    ///
    /// Nothing is sent until [`GatewaySession::connect`] is called.
    pub fn session(
        &self,
        name: impl Into<String>,
        api_id: i32,
        api_hash: SecretString,
    ) -> GatewaySession {
        GatewaySession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            name: name.into(),
            api_id,
            api_hash,
            connected: AtomicBool::new(false),
        }
    }
}

/// One user session on the gateway.
pub struct GatewaySession {
    client: Client,
    base_url: String,
    name: String,
    api_id: i32,
    api_hash: SecretString,
    connected: AtomicBool,
}

impl GatewaySession {
    /// Whether the last connect succeeded and no transport failure was seen since.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/sessions/{}/{}", self.base_url, encode(&self.name), path)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                let err = ClientError::from(e);
                if err.is_transport() {
                    warn!(session = %self.name, "Gateway unreachable, marking session disconnected");
                    self.connected.store(false, Ordering::SeqCst);
                }
                return Err(err);
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(b) => b.error,
                Err(_) => body,
            };
            return Err(ClientError::Api { status, message });
        }

        Ok(response)
    }

    /// Connect the session, loading its persisted state on the gateway.
    #[instrument(skip(self), fields(session = %self.name))]
    pub async fn connect(&self) -> Result<(), ClientError> {
        let body = ConnectRequest {
            api_id: self.api_id,
            api_hash: self.api_hash.expose_secret(),
        };

        self.execute(self.client.post(self.url("connect")).json(&body))
            .await?;

        self.connected.store(true, Ordering::SeqCst);
        debug!("Session connected");
        Ok(())
    }

    /// Ask the gateway whether the session is signed in.
    #[instrument(skip(self), fields(session = %self.name))]
    pub async fn is_authorized(&self) -> Result<bool, ClientError> {
        let response = self
            .execute(self.client.get(self.url("authorization")))
            .await?;

        let status: AuthorizationStatus = response.json().await?;
        Ok(status.authorized)
    }

    /// Request a login code for `phone`.
    #[instrument(skip(self), fields(session = %self.name))]
    pub async fn send_code(&self, phone: &str) -> Result<SentCode, ClientError> {
        let response = self
            .execute(
                self.client
                    .post(self.url("auth/code"))
                    .json(&SendCodeRequest { phone }),
            )
            .await?;

        Ok(response.json().await?)
    }

    /// Complete sign-in with the code the user received.
    #[instrument(skip(self, code, phone_code_hash), fields(session = %self.name))]
    pub async fn sign_in(
        &self,
        phone: &str,
        code: &str,
        phone_code_hash: &str,
    ) -> Result<(), ClientError> {
        let body = SignInRequest {
            phone,
            code,
            phone_code_hash,
        };

        self.execute(self.client.post(self.url("auth/sign-in")).json(&body))
            .await?;

        debug!("Signed in");
        Ok(())
    }

    /// Resolve a peer id through the session's entity cache.
    #[instrument(skip(self), fields(session = %self.name))]
    pub async fn get_entity(&self, id: i64) -> Result<Entity, ClientError> {
        let response = self
            .execute(self.client.get(self.url(&format!("entities/{}", id))))
            .await?;

        Ok(response.json().await?)
    }

    /// Fetch the dialog list, refreshing the entity cache.
    #[instrument(skip(self), fields(session = %self.name))]
    pub async fn get_dialogs(&self) -> Result<usize, ClientError> {
        let response = self
            .execute(self.client.post(self.url("dialogs/sync")))
            .await?;

        let sync: DialogSync = response.json().await?;
        debug!("Synced {} dialogs", sync.count);
        Ok(sync.count)
    }

    /// Send a text message to a resolved peer.
    #[instrument(skip(self, text), fields(session = %self.name, peer = entity.id))]
    pub async fn send_message(
        &self,
        entity: &Entity,
        text: &str,
    ) -> Result<SendMessageResponse, ClientError> {
        let body = SendMessageRequest {
            peer: entity.id,
            text,
        };

        let response = self
            .execute(self.client.post(self.url("messages")).json(&body))
            .await?;

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for GatewaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySession")
            .field("base_url", &self.base_url)
            .field("name", &self.name)
            .field("api_id", &self.api_id)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
