//! Webhook signature verification.
//!
//! Pexipay signs every delivery with HMAC-SHA256 over the exact raw request
//! body, hex-encoded into the `x-pexipay-signature` header. Verify against
//! the raw bytes before parsing anything.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::api::ApiResult;
use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature on webhook deliveries.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-pexipay-signature";

/// Checks a webhook signature. Comparison is constant-time, and every
/// malformed-input path reports `false` rather than erroring: signature
/// checks fail closed.
pub fn verify_webhook_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    let Ok(signature) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

/// Verifies and parses a webhook delivery. The payload is only parsed once
/// the signature checks out, so unauthenticated bodies never reach the JSON
/// parser.
pub fn construct_webhook_event(payload: &[u8], signature: &str, secret: &str) -> ApiResult<Value> {
    if !verify_webhook_signature(payload, signature, secret) {
        return Err(ApiError::validation("Invalid webhook signature"));
    }
    serde_json::from_slice(payload)
        .map_err(|e| ApiError::validation(format!("Invalid webhook payload: {}", e)))
}
