//! Order payloads exchanged with Jumpseller.
//!
//! This module defines:
//! - The inbound `order_created` webhook body
//! - The validated [`OrderReference`] the handler works with
//! - The outbound [`StatusUpdate`] sent back to the order API

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WebhookError;

/// Note template sent with the pickup status; `{date}` is the formatted date.
const PICKUP_NOTE_PREFIX: &str = "Tu pedido estará listo para ser retirado a partir del";

// =============================================================================
// Inbound Webhook Types
// =============================================================================

/// Body of an order-created webhook.
///
/// Every field is optional so that missing data is reported as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderCreatedWebhook {
    #[serde(default)]
    pub order: Option<OrderPayload>,
}

/// The subset of the order object this service reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPayload {
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Order identifier. Jumpseller sends numbers, but strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OrderId {
    Number(u64),
    Text(String),
}

impl OrderId {
    fn is_blank(&self) -> bool {
        match self {
            OrderId::Number(_) => false,
            OrderId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Number(n) => write!(f, "{}", n),
            OrderId::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

/// A validated order: identifier plus creation time in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReference {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
}

impl OrderCreatedWebhook {
    /// Identifier of the order, if present, for log context.
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order
            .as_ref()
            .and_then(|o| o.id.as_ref())
            .filter(|id| !id.is_blank())
    }

    /// Validate the payload into an [`OrderReference`].
    pub fn into_reference(self) -> Result<OrderReference, WebhookError> {
        let order = self
            .order
            .ok_or_else(|| WebhookError::Validation("missing order object".to_string()))?;

        let id = order
            .id
            .filter(|id| !id.is_blank())
            .ok_or_else(|| WebhookError::Validation("missing order.id".to_string()))?;

        let raw_created_at = order
            .created_at
            .ok_or_else(|| WebhookError::Validation("missing order.created_at".to_string()))?;

        let created_at = parse_timestamp(&raw_created_at).ok_or_else(|| {
            WebhookError::Validation(format!("invalid order.created_at: {}", raw_created_at))
        })?;

        Ok(OrderReference { id, created_at })
    }
}

/// Parse an order timestamp into UTC.
///
/// Accepts RFC 3339 (`2024-06-07T10:00:00Z`), Jumpseller's
/// `2024-06-07 10:00:00 UTC`, and offset-less `2024-06-07 10:00:00` (UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = raw.strip_suffix(" UTC").unwrap_or(raw);
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}

// =============================================================================
// Outbound Status Update
// =============================================================================

/// Body of the `PUT /orders/{id}.json` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub order: StatusUpdateFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateFields {
    pub status: String,
    pub shipping_status_notes: String,
}

impl StatusUpdate {
    /// Build the pickup-ready update for an already formatted date.
    pub fn pickup_ready(status: &str, pickup_date: &str) -> Self {
        Self {
            order: StatusUpdateFields {
                status: status.to_string(),
                shipping_status_notes: format!("{} {}.", PICKUP_NOTE_PREFIX, pickup_date),
            },
        }
    }
}
