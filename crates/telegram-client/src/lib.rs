//! Telegram user-API gateway client.
//!
//! The gateway owns the MTProto connection and the per-session files on
//! disk; this crate only speaks its JSON API.

mod client;
mod error;
mod types;

pub use client::{GatewayClient, GatewaySession};
pub use error::ClientError;
pub use types::*;
