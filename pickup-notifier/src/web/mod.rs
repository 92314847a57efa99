//! Web server module for handling inbound webhooks.
//!
//! This module provides the HTTP surface of the service:
//! - Receives order-created webhooks from Jumpseller
//! - Verifies the HMAC signature over the raw body
//! - Marks the order ready for pickup via the order API
//!
//! The outbound update is awaited before the webhook is answered.

pub mod extract;
pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use extract::SignedBody;
pub use handlers::{health, order_created_webhook, AppState, HealthResponse, WebhookResponse};
pub use signature::{
    is_signature_verification_enabled, sign_body, verify_webhook_signature, EVENT_HEADER,
    SIGNATURE_HEADER,
};

/// Path Jumpseller posts order-created notifications to.
pub const ORDER_CREATED_PATH: &str = "/webhook/pedido-creado";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(ORDER_CREATED_PATH, post(order_created_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
