//! Client for the Jumpseller order API.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info};
use url::Url;

use super::types::{OrderId, StatusUpdate};
use crate::config::Credentials;
use crate::error::UpstreamError;

/// Upper bound on how much of an error body is kept for logs.
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for updating orders.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct OrderApiClient {
    http: Client,
    base_url: Url,
}

impl OrderApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, UpstreamError> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw)
            .map_err(|e| UpstreamError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(raw.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self { http, base_url })
    }

    /// URL of a single order resource.
    ///
    /// The id is pushed as one percent-encoded path segment, so `/`, `?` or
    /// `#` inside a text id cannot leave `/orders/`.
    pub fn order_url(&self, id: &OrderId) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("orders")
                .push(&format!("{}.json", id));
        }
        url
    }

    /// Send a status update for one order.
    ///
    /// Any non-2xx answer is an error; the call is never retried.
    pub async fn update_order(
        &self,
        credentials: &Credentials,
        id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<(), UpstreamError> {
        let url = self.order_url(id);

        info!(
            order_id = %id,
            url = %url,
            status = %update.order.status,
            "order_update_starting"
        );

        let response = self
            .http
            .put(url.clone())
            .basic_auth(&credentials.api_login, Some(&credentials.api_token))
            .json(update)
            .send()
            .await
            .map_err(|e| {
                let err = UpstreamError::from(e);
                match &err {
                    UpstreamError::Timeout => {
                        error!(order_id = %id, url = %url, "order_update_timeout")
                    }
                    other => {
                        error!(order_id = %id, url = %url, error = %other, "order_update_failed")
                    }
                }
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!(order_id = %id, error = %e, "order_update_error_body_unreadable");
                    format!("<unreadable body: {}>", e)
                }
            };
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);

            error!(
                order_id = %id,
                status_code = status.as_u16(),
                body = %body,
                "order_update_rejected"
            );

            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            order_id = %id,
            status_code = status.as_u16(),
            "order_update_complete"
        );

        Ok(())
    }
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
