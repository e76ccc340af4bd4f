//! Telegram Bridge - HTTP front for a Telegram user session.
//!
//! The bridge:
//! - Logs a user account in with phone number and one-time code
//! - Keeps one live gateway session per phone number
//! - Relays text messages from that session to a single fixed chat

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod session;

pub use config::Config;
pub use error::BridgeError;
pub use flow::{Bridge, LoginStatus, TARGET_CHAT_ID};
pub use session::{ClientFactory, Credentials, MessagingClient, PendingAuth, SessionManager};
