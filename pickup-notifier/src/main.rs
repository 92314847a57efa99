//! Pickup Notifier web server.
//!
//! This binary:
//! - Receives order-created webhooks from Jumpseller
//! - Verifies their signatures
//! - Marks each order ready for pickup three business days out

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pickup::web::is_signature_verification_enabled;
use pickup::{router, AppState, Config, OrderApiClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        api_base_url = %config.api_base_url,
        api_login_configured = config.api_login.is_some(),
        api_token_configured = config.api_token.is_some(),
        webhook_signing_configured = is_signature_verification_enabled(&config.webhook_secret),
        request_timeout_ms = config.request_timeout_ms,
        pickup_business_days = config.pickup_business_days,
        "config_loaded"
    );

    if config.credentials().is_err() {
        warn!("credentials_incomplete_webhooks_will_fail");
    }

    let orders = OrderApiClient::new(config.api_base_url.clone(), config.request_timeout())
        .context("Failed to build order API client")?;

    let port = config.port;
    let app = router(AppState::new(config, orders));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
