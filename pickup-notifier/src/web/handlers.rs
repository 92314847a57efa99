//! Webhook endpoint handlers.
//!
//! The order-created handler runs a linear pipeline, stopping at the first
//! failure:
//! 1. Check that all secrets are configured
//! 2. Verify the HMAC signature over the raw body
//! 3. Validate the order payload
//! 4. Compute the pickup date
//! 5. Push the status update to the order API

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::WebhookError;
use crate::order::{OrderApiClient, OrderCreatedWebhook, OrderId, StatusUpdate};
use crate::pickup::{format_pickup_date, pickup_ready_at};
use crate::web::extract::SignedBody;
use crate::web::signature::{verify_webhook_signature, EVENT_HEADER, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orders: OrderApiClient,
}

impl AppState {
    pub fn new(config: Config, orders: OrderApiClient) -> Self {
        Self {
            config: Arc::new(config),
            orders,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Order Created Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
}

/// Order-created webhook endpoint.
pub async fn order_created_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: SignedBody,
) -> Response {
    let event = header_str(&headers, EVENT_HEADER).unwrap_or("unknown");

    info!(
        event = %event,
        body_length = body.raw.len(),
        has_signature = headers.contains_key(SIGNATURE_HEADER),
        "order_webhook_received"
    );
    debug!(body = %String::from_utf8_lossy(&body.raw), "order_webhook_body");

    let mut order_id = None;
    match process_order_created(&state, &headers, &body, &mut order_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            match &err {
                WebhookError::Configuration(setting) => {
                    error!(setting = %setting, "order_webhook_not_configured")
                }
                WebhookError::Authentication => {
                    warn!(event = %event, "order_webhook_signature_invalid")
                }
                WebhookError::Validation(reason) => {
                    warn!(order_id = ?order_id, reason = %reason, "order_webhook_invalid_payload")
                }
                WebhookError::Upstream(e) => {
                    error!(order_id = ?order_id, error = %e, "order_webhook_update_failed")
                }
            }

            err.into_response()
        }
    }
}

/// Run the webhook pipeline. `order_id` is filled in as soon as the payload
/// parses, so failures after that point can be logged against the order.
async fn process_order_created(
    state: &AppState,
    headers: &HeaderMap,
    body: &SignedBody,
    order_id: &mut Option<String>,
) -> Result<WebhookResponse, WebhookError> {
    let credentials = state.config.credentials()?;

    let signature = header_str(headers, SIGNATURE_HEADER);
    if !verify_webhook_signature(&credentials.webhook_secret, &body.raw, signature) {
        return Err(WebhookError::Authentication);
    }

    let webhook = body.parse::<OrderCreatedWebhook>()?;
    *order_id = webhook.order_id().map(OrderId::to_string);
    let order = webhook.into_reference()?;

    info!(
        order_id = %order.id,
        created_at = %order.created_at,
        "order_webhook_processing"
    );

    let ready_at = pickup_ready_at(&order.created_at, state.config.pickup_business_days)
        .ok_or_else(|| WebhookError::Validation("order.created_at out of range".to_string()))?;
    let pickup_date = format_pickup_date(ready_at.date_naive());

    info!(
        order_id = %order.id,
        business_days = state.config.pickup_business_days,
        pickup_date = %pickup_date,
        "pickup_date_calculated"
    );

    let update = StatusUpdate::pickup_ready(&state.config.pickup_status, &pickup_date);
    state
        .orders
        .update_order(&credentials, &order.id, &update)
        .await?;

    info!(order_id = %order.id, "order_webhook_completed");

    Ok(WebhookResponse {
        status: "updated",
        message: None,
        order_id: Some(order.id.to_string()),
        pickup_date: Some(pickup_date),
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::time::Duration;

    fn state(config: Config) -> AppState {
        // Nothing listens on port 9; these tests never reach the network.
        let orders = OrderApiClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        AppState::new(config, orders)
    }

    fn configured() -> Config {
        Config {
            api_login: Some("login".to_string()),
            api_token: Some("token".to_string()),
            webhook_secret: Some("secret".to_string()),
            ..Config::default()
        }
    }

    fn body(json: &'static str) -> SignedBody {
        SignedBody::new(axum::body::Bytes::from_static(json.as_bytes()))
    }

    #[tokio::test]
    async fn test_missing_credentials_checked_before_signature() {
        let state = state(Config::default());
        let err = process_order_created(&state, &HeaderMap::new(), &body("{}"), &mut None)
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_bad_signature_checked_before_payload() {
        let state = state(configured());
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("deadbeef"));

        let err = process_order_created(&state, &headers, &body("not json"), &mut None)
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Authentication));
    }

    #[tokio::test]
    async fn test_signed_invalid_payload_is_validation_error() {
        let state = state(configured());
        let raw = r#"{"order":{"created_at":"2024-06-07T10:00:00Z"}}"#;
        let signature = crate::web::signature::sign_body("secret", raw.as_bytes());
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&signature).unwrap());

        let mut order_id = None;
        let err = process_order_created(&state, &headers, &body(raw), &mut order_id)
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Validation(_)));
        assert_eq!(order_id, None);
    }

    #[tokio::test]
    async fn test_order_id_recorded_when_update_fails() {
        let state = state(configured());
        let raw = r#"{"order":{"id":77,"created_at":"2024-06-07T10:00:00Z"}}"#;
        let signature = crate::web::signature::sign_body("secret", raw.as_bytes());
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&signature).unwrap());

        let mut order_id = None;
        let err = process_order_created(&state, &headers, &body(raw), &mut order_id)
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Upstream(_)));
        assert_eq!(order_id.as_deref(), Some("77"));
    }

    #[test]
    fn test_header_str() {
        let mut headers = HeaderMap::new();
        headers.insert(EVENT_HEADER, HeaderValue::from_static("order_created"));
        assert_eq!(header_str(&headers, EVENT_HEADER), Some("order_created"));
        assert_eq!(header_str(&headers, SIGNATURE_HEADER), None);
    }
}
