//! Jumpseller webhook signature verification.
//!
//! Each webhook carries an HMAC-SHA256 of the raw request body, keyed with the
//! store's hooks token and hex-encoded, in the `Jumpseller-Hmac-Sha256` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "jumpseller-hmac-sha256";

/// Header carrying the event name, e.g. `order_created`.
pub const EVENT_HEADER: &str = "jumpseller-event";

/// Verify a webhook signature against the raw body.
///
/// # Arguments
///
/// * `secret` - The shared webhook signing secret
/// * `body` - The request body exactly as received
/// * `signature` - The hex signature header, if present
///
/// # Returns
///
/// `true` only if `signature` is the hex HMAC-SHA256 of `body` under `secret`.
/// Missing, empty or malformed signatures yield `false`.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature: Option<&str>) -> bool {
    let signature = signature.map(str::trim).unwrap_or("");

    if secret.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !signature.is_empty(),
            "webhook_signature_missing_fields"
        );
        return false;
    }

    let claimed = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "webhook_signature_not_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);

    // Constant-time comparison over the digest bytes
    let valid = mac.verify_slice(&claimed).is_ok();

    if !valid {
        warn!(
            body_length = body.len(),
            signature_length = signature.len(),
            "webhook_signature_mismatch"
        );
    }

    valid
}

/// Compute the hex signature a sender would attach to `body`.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Check if webhook signature verification is configured.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}
