//! Error types for webhook handling.
//!
//! Every failure in the request path is a [`WebhookError`]; it maps to an
//! HTTP status at the handler boundary so nothing reaches the runtime as a
//! panic.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::web::handlers::WebhookResponse;

/// Failures while calling the remote order API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("order API request timed out")]
    Timeout,

    #[error("order API transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid order API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("order API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err)
        }
    }
}

/// Request-level failures, one per terminal state of the webhook flow.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A required secret is not configured. Holds the variable name.
    #[error("missing configuration: {0}")]
    Configuration(&'static str),

    #[error("webhook signature verification failed")]
    Authentication,

    #[error("invalid webhook payload: {0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable label used in the response body.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Authentication => "unauthorized",
            Self::Validation(_) => "invalid_payload",
            Self::Upstream(_) => "upstream_error",
        }
    }

    /// Message safe to return to the webhook sender.
    fn public_message(&self) -> String {
        match self {
            Self::Configuration(_) => "Server configuration error".to_string(),
            Self::Authentication => "Invalid webhook signature".to_string(),
            Self::Validation(reason) => reason.clone(),
            Self::Upstream(_) => "Failed to update order".to_string(),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let body = WebhookResponse {
            status: self.label(),
            message: Some(self.public_message()),
            order_id: None,
            pickup_date: None,
        };

        (self.status_code(), Json(body)).into_response()
    }
}
