//! Pickup Notifier - marks new Jumpseller orders ready for in-store pickup.
//!
//! When a store receives an order, Jumpseller posts an `order_created`
//! webhook. This service authenticates it, computes the pickup date three
//! business days out, and writes the status back to the order.
//!
//! ## Architecture
//!
//! ```text
//! Jumpseller → POST /webhook/pedido-creado → verify → pickup date → PUT /orders/{id}.json
//! ```

pub mod config;
pub mod error;
pub mod order;
pub mod pickup;
pub mod web;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use error::{UpstreamError, WebhookError};
pub use order::{OrderApiClient, OrderCreatedWebhook, OrderId, OrderReference, StatusUpdate};
pub use pickup::{add_business_days, format_pickup_date, pickup_ready_at, DEFAULT_BUSINESS_DAYS};
pub use web::{router, AppState};
