//! In-memory fakes for the messaging client.

use super::{ClientFactory, Credentials, MessagingClient};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use telegram_client::{ClientError, Entity, EntityKind, SentCode};

pub(crate) const VALID_CODE: &str = "12345";

/// State of one persisted session, shared by every client opened on it.
#[derive(Default)]
pub(crate) struct FakeSession {
    pub authorized: AtomicBool,
    /// Destination already in the entity cache
    pub entity_cached: AtomicBool,
    /// Dialog sync puts the destination into the cache
    pub populate_on_sync: AtomicBool,
    /// Gateway refuses connections
    pub offline: AtomicBool,
    /// Telegram rejects code requests
    pub reject_code_request: AtomicBool,
    /// Drop the connection of the next client that checks it
    pub kick: AtomicBool,

    pub connects: AtomicUsize,
    pub code_requests: AtomicUsize,
    pub sign_ins: AtomicUsize,
    pub resolves: AtomicUsize,
    pub syncs: AtomicUsize,
    pub sent: Mutex<Vec<(i64, String)>>,
}

fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status,
        message: message.to_string(),
    }
}

pub(crate) struct FakeClient {
    session: Arc<FakeSession>,
    connected: AtomicBool,
}

#[async_trait]
impl MessagingClient for FakeClient {
    fn is_connected(&self) -> bool {
        if self.session.kick.swap(false, Ordering::SeqCst) {
            self.connected.store(false, Ordering::SeqCst);
        }
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<(), ClientError> {
        self.session.connects.fetch_add(1, Ordering::SeqCst);
        if self.session.offline.load(Ordering::SeqCst) {
            return Err(api_error(503, "Connection to Telegram failed"));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_authorized(&self) -> Result<bool, ClientError> {
        Ok(self.session.authorized.load(Ordering::SeqCst))
    }

    async fn send_code(&self, _phone: &str) -> Result<SentCode, ClientError> {
        let n = self.session.code_requests.fetch_add(1, Ordering::SeqCst);
        if self.session.reject_code_request.load(Ordering::SeqCst) {
            return Err(api_error(
                400,
                "The api_id/api_hash combination is invalid (caused by SendCodeRequest)",
            ));
        }
        Ok(SentCode {
            phone_code_hash: format!("hash-{}", n + 1),
        })
    }

    async fn sign_in(
        &self,
        _phone: &str,
        code: &str,
        _phone_code_hash: &str,
    ) -> Result<(), ClientError> {
        self.session.sign_ins.fetch_add(1, Ordering::SeqCst);
        if code != VALID_CODE {
            return Err(api_error(
                400,
                "The phone code entered was invalid (caused by SignInRequest)",
            ));
        }
        self.session.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn get_entity(&self, id: i64) -> Result<Entity, ClientError> {
        self.session.resolves.fetch_add(1, Ordering::SeqCst);
        if !self.session.entity_cached.load(Ordering::SeqCst) {
            return Err(api_error(
                400,
                "Could not find the input entity for PeerChat",
            ));
        }
        Ok(Entity {
            id,
            kind: EntityKind::Chat,
            title: Some("Notes".into()),
        })
    }

    async fn get_dialogs(&self) -> Result<usize, ClientError> {
        self.session.syncs.fetch_add(1, Ordering::SeqCst);
        if self.session.populate_on_sync.load(Ordering::SeqCst) {
            self.session.entity_cached.store(true, Ordering::SeqCst);
        }
        Ok(3)
    }

    async fn send_message(&self, entity: &Entity, text: &str) -> Result<(), ClientError> {
        self.session
            .sent
            .lock()
            .unwrap()
            .push((entity.id, text.to_string()));
        Ok(())
    }
}

/// Factory handing out fresh [`FakeClient`]s over shared [`FakeSession`]s.
#[derive(Default)]
pub(crate) struct FakeFactory {
    sessions: Mutex<HashMap<String, Arc<FakeSession>>>,
    pub created: AtomicUsize,
}

impl FakeFactory {
    /// Session state for `name`, created on first access.
    pub fn session(&self, name: &str) -> Arc<FakeSession> {
        self.sessions
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl ClientFactory for FakeFactory {
    fn create(&self, session: &str, _credentials: &Credentials) -> Arc<dyn MessagingClient> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(FakeClient {
            session: self.session(session),
            connected: AtomicBool::new(false),
        })
    }
}
