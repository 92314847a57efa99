//! Request body extractor that keeps the wire bytes for signature checks.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::error::WebhookError;

/// A request body as raw bytes plus its JSON parse, if it parsed.
///
/// Signatures must be checked against `raw`, never against a re-serialization
/// of `json`. A body that is not valid JSON is still extracted (with `json`
/// set to `None`) so authentication runs before payload validation.
#[derive(Debug, Clone)]
pub struct SignedBody {
    pub raw: Bytes,
    pub json: Option<Value>,
}

impl SignedBody {
    pub fn new(raw: Bytes) -> Self {
        let json = serde_json::from_slice(&raw).ok();
        Self { raw, json }
    }

    /// Deserialize the parsed body into `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, WebhookError> {
        let value = self
            .json
            .as_ref()
            .ok_or_else(|| WebhookError::Validation("body is not valid JSON".to_string()))?;

        T::deserialize(value)
            .map_err(|e| WebhookError::Validation(format!("unexpected payload shape: {}", e)))
    }
}

#[async_trait]
impl<S> FromRequest<S> for SignedBody
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let raw = Bytes::from_request(req, state).await?;
        Ok(SignedBody::new(raw))
    }
}
