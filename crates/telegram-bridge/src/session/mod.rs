//! Session registry and pending-login registry.

mod client;
#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientFactory, MessagingClient};

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use telegram_client::ClientError;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Telegram application credentials (`api_id` / `api_hash`).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: SecretString,
}

impl Credentials {
    pub fn new(api_id: i32, api_hash: impl Into<String>) -> Self {
        Self {
            api_id,
            api_hash: SecretString::new(api_hash.into()),
        }
    }
}

/// A login waiting for its one-time code.
#[derive(Clone)]
pub struct PendingAuth {
    /// Client the code was requested on
    pub client: Arc<dyn MessagingClient>,
    /// Token issued by Telegram with the code
    pub phone_code_hash: String,
    pub requested_at: DateTime<Utc>,
}

impl PendingAuth {
    pub fn new(client: Arc<dyn MessagingClient>, phone_code_hash: impl Into<String>) -> Self {
        Self {
            client,
            phone_code_hash: phone_code_hash.into(),
            requested_at: Utc::now(),
        }
    }
}

impl fmt::Debug for PendingAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAuth")
            .field("requested_at", &self.requested_at)
            .finish_non_exhaustive()
    }
}

/// Name of the persisted session for a phone number: `session_` followed by its digits.
pub fn session_name(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("session_{}", digits)
}

/// Owns the live clients and the pending logins, both keyed by phone number.
///
/// Map access is atomic but whole flows are not serialized per phone: two
/// concurrent requests for the same phone may both create and connect a
/// client (only the first one is kept), and a pending login may be
/// consumed or replaced between a read and a removal.
pub struct SessionManager {
    factory: Arc<dyn ClientFactory>,
    clients: RwLock<HashMap<String, Arc<dyn MessagingClient>>>,
    pending: RwLock<HashMap<String, PendingAuth>>,
}

impl SessionManager {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            clients: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Return the connected client for `phone`, creating it on first use.
    ///
    /// An existing client is reconnected if its connection dropped. The
    /// credentials are only used when a client has to be created.
    pub async fn get_or_create(
        &self,
        phone: &str,
        credentials: &Credentials,
    ) -> Result<Arc<dyn MessagingClient>, ClientError> {
        let existing = self.clients.read().await.get(phone).cloned();

        if let Some(client) = existing {
            if !client.is_connected() {
                debug!(phone = %phone, "Reconnecting session");
                client.connect().await?;
            }
            return Ok(client);
        }

        let session = session_name(phone);
        let client = self.factory.create(&session, credentials);
        client.connect().await?;

        let mut clients = self.clients.write().await;
        let client = clients
            .entry(phone.to_string())
            .or_insert_with(|| {
                info!(phone = %phone, session = %session, "Session created");
                client
            })
            .clone();

        Ok(client)
    }

    /// Store a pending login, replacing any previous one for the phone.
    pub async fn insert_pending(&self, phone: &str, pending: PendingAuth) -> Option<PendingAuth> {
        self.pending.write().await.insert(phone.to_string(), pending)
    }

    pub async fn pending(&self, phone: &str) -> Option<PendingAuth> {
        self.pending.read().await.get(phone).cloned()
    }

    pub async fn remove_pending(&self, phone: &str) -> Option<PendingAuth> {
        self.pending.write().await.remove(phone)
    }

    pub async fn has_pending(&self, phone: &str) -> bool {
        self.pending.read().await.contains_key(phone)
    }

    /// Number of live clients.
    pub async fn session_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }

    /// When the longest-waiting login asked for its code.
    pub async fn oldest_pending(&self) -> Option<DateTime<Utc>> {
        self.pending
            .read()
            .await
            .values()
            .map(|p| p.requested_at)
            .min()
    }

    pub async fn health_check(&self) -> bool {
        self.factory.health_check().await
    }
}
