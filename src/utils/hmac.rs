//! HMAC signature generation and validation utilities.

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(secret: &str, payload: &[u8], timestamp: i64) -> Result<HmacSha256, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    Ok(mac)
}

/// Hex HMAC-SHA256 of `{timestamp}.{payload}`
pub fn generate_signature(
    secret: &str,
    payload: &[u8],
    timestamp: i64,
) -> Result<String, InvalidLength> {
    let mac = keyed_mac(secret, payload, timestamp)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Validate a hex HMAC-SHA256 signature.
///
/// Timestamps further than `tolerance_seconds` from `now` are rejected before
/// the signature is checked. The comparison is constant-time.
pub fn validate_signature(
    secret: &str,
    payload: &[u8],
    timestamp: i64,
    signature: &str,
    now: i64,
    tolerance_seconds: i64,
) -> bool {
    if now.abs_diff(timestamp) > tolerance_seconds.unsigned_abs() {
        return false;
    }

    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };

    keyed_mac(secret, payload, timestamp)
        .is_ok_and(|mac| mac.verify_slice(&signature_bytes).is_ok())
}
