//! Telegram Bridge - Entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use telegram_bridge::{
    api::{create_router, AppState},
    config::{Config, LogConfig, LogFormat},
    Bridge, SessionManager, TARGET_CHAT_ID,
};
use telegram_client::GatewayClient;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log);

    let gateway = match GatewayClient::new(&config.gateway.url, config.gateway.timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create gateway client: {}", e);
            std::process::exit(1);
        }
    };

    if gateway.health_check().await {
        info!("Telegram gateway healthy at {}", gateway.base_url());
    } else {
        warn!(
            "Telegram gateway not reachable at {} - will retry on requests",
            gateway.base_url()
        );
    }

    let sessions = Arc::new(SessionManager::new(Arc::new(gateway)));
    let state = AppState::new(Bridge::new(sessions));
    let app = create_router(state);

    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([127, 0, 0, 1].into()),
        config.server.port,
    );

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("--------------------------------------------------");
    info!("   TELEGRAM BRIDGE");
    info!("--------------------------------------------------");
    info!("Target Chat ID: {}", TARGET_CHAT_ID);
    info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
