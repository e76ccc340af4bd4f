//! Common test utilities for integration tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use telegram_bridge::{
    api::{create_router, AppState},
    Bridge, ClientFactory, Credentials, MessagingClient, SessionManager,
};
use telegram_client::{ClientError, Entity, EntityKind, SentCode};
use tower::ServiceExt;

pub const VALID_CODE: &str = "12345";

/// Persisted state of one fake Telegram account.
#[derive(Default)]
pub struct FakeAccount {
    pub authorized: AtomicBool,
    pub in_chat: AtomicBool,
    pub syncs: AtomicUsize,
    pub sent: Mutex<Vec<String>>,
}

struct FakeClient {
    account: Arc<FakeAccount>,
    connected: AtomicBool,
}

fn api_error(message: &str) -> ClientError {
    ClientError::Api {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl MessagingClient for FakeClient {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<(), ClientError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_authorized(&self) -> Result<bool, ClientError> {
        Ok(self.account.authorized.load(Ordering::SeqCst))
    }

    async fn send_code(&self, _phone: &str) -> Result<SentCode, ClientError> {
        Ok(SentCode {
            phone_code_hash: "code-hash".into(),
        })
    }

    async fn sign_in(&self, _phone: &str, code: &str, hash: &str) -> Result<(), ClientError> {
        if code != VALID_CODE || hash != "code-hash" {
            return Err(api_error("The phone code entered was invalid"));
        }
        self.account.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn get_entity(&self, id: i64) -> Result<Entity, ClientError> {
        let cached = self.account.syncs.load(Ordering::SeqCst) > 0;
        if !cached || !self.account.in_chat.load(Ordering::SeqCst) {
            return Err(api_error("Could not find the input entity"));
        }
        Ok(Entity {
            id,
            kind: EntityKind::Chat,
            title: None,
        })
    }

    async fn get_dialogs(&self) -> Result<usize, ClientError> {
        self.account.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }

    async fn send_message(&self, _entity: &Entity, text: &str) -> Result<(), ClientError> {
        self.account.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Fake gateway: accounts keyed by session name.
#[derive(Default)]
pub struct FakeGateway {
    accounts: Mutex<HashMap<String, Arc<FakeAccount>>>,
    pub healthy: AtomicBool,
}

impl FakeGateway {
    pub fn account(&self, session: &str) -> Arc<FakeAccount> {
        self.accounts
            .lock()
            .unwrap()
            .entry(session.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl ClientFactory for FakeGateway {
    fn create(&self, session: &str, _credentials: &Credentials) -> Arc<dyn MessagingClient> {
        Arc::new(FakeClient {
            account: self.account(session),
            connected: AtomicBool::new(false),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Build a router over a fresh fake gateway.
pub fn test_app() -> (Arc<FakeGateway>, Router) {
    let gateway = Arc::new(FakeGateway::default());
    let sessions = Arc::new(SessionManager::new(gateway.clone()));
    let app = create_router(AppState::new(Bridge::new(sessions)));
    (gateway, app)
}

/// POST a JSON body and return status plus parsed response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (axum::http::StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    read_json(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn read_json(response: Response<Body>) -> (axum::http::StatusCode, serde_json::Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
