//! Order module for the Jumpseller side of the flow.
//!
//! This module provides:
//! - Webhook and status-update payload types
//! - An async client for the order API
//!
//! ## Flow
//!
//! ```text
//! order_created webhook → OrderReference → StatusUpdate → PUT /orders/{id}.json
//! ```

pub mod client;
pub mod types;

pub use client::OrderApiClient;
pub use types::{
    parse_timestamp, OrderCreatedWebhook, OrderId, OrderPayload, OrderReference, StatusUpdate,
    StatusUpdateFields,
};
