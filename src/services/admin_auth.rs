//! Signature check guarding the administrative endpoints.
//!
//! Callers sign the raw request body with the shared `HMAC_SECRET`:
//! `X-Signature` carries the hex HMAC-SHA256 of `{X-Timestamp}.{body}`.

use crate::{config::HmacConfig, utils::hmac::validate_signature};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};

pub const SIGNATURE_HEADER: &str = "X-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Why an administrative request was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminAuthError {
    #[error("Administrative endpoints are disabled")]
    Disabled,
    #[error("Missing {0} header")]
    MissingHeader(&'static str),
    #[error("Invalid X-Timestamp format")]
    InvalidTimestamp,
    #[error("Invalid or expired signature")]
    InvalidSignature,
}

impl ResponseError for AdminAuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": "Unauthorized",
            "message": self.to_string(),
        }))
    }
}

fn header<'a>(req: &'a HttpRequest, name: &'static str) -> Result<&'a str, AdminAuthError> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .ok_or(AdminAuthError::MissingHeader(name))
}

/// Verify the request signature over `body` at time `now`
pub fn verify_admin_signature(
    req: &HttpRequest,
    body: &[u8],
    config: &HmacConfig,
    now: i64,
) -> Result<(), AdminAuthError> {
    let secret = config.secret.as_deref().ok_or(AdminAuthError::Disabled)?;

    let signature = header(req, SIGNATURE_HEADER)?;
    let timestamp: i64 = header(req, TIMESTAMP_HEADER)?
        .trim()
        .parse()
        .map_err(|_| AdminAuthError::InvalidTimestamp)?;

    if validate_signature(
        secret,
        body,
        timestamp,
        signature,
        now,
        config.timestamp_tolerance_seconds,
    ) {
        Ok(())
    } else {
        Err(AdminAuthError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hmac::generate_signature;
    use actix_web::test::TestRequest;

    const BODY: &[u8] = br#"{"identifier":"alice@example.com"}"#;

    fn signed_request(secret: &str, timestamp: i64) -> HttpRequest {
        TestRequest::post()
            .insert_header((SIGNATURE_HEADER, generate_signature(secret, BODY, timestamp).unwrap()))
            .insert_header((TIMESTAMP_HEADER, timestamp.to_string()))
            .to_http_request()
    }

    #[test]
    fn test_valid_signature_passes() {
        let config = HmacConfig::with_secret("admin-secret");
        let req = signed_request("admin-secret", 1_000);
        assert_eq!(verify_admin_signature(&req, BODY, &config, 1_010), Ok(()));
    }

    #[test]
    fn test_rejections() {
        let config = HmacConfig::with_secret("admin-secret");

        let unsigned = TestRequest::post().to_http_request();
        assert_eq!(
            verify_admin_signature(&unsigned, BODY, &config, 0),
            Err(AdminAuthError::MissingHeader(SIGNATURE_HEADER))
        );

        let bad_timestamp = TestRequest::post()
            .insert_header((SIGNATURE_HEADER, "00"))
            .insert_header((TIMESTAMP_HEADER, "yesterday"))
            .to_http_request();
        assert_eq!(
            verify_admin_signature(&bad_timestamp, BODY, &config, 0),
            Err(AdminAuthError::InvalidTimestamp)
        );

        let wrong_key = signed_request("guessed", 1_000);
        assert_eq!(
            verify_admin_signature(&wrong_key, BODY, &config, 1_000),
            Err(AdminAuthError::InvalidSignature)
        );

        let stale = signed_request("admin-secret", 1_000);
        assert_eq!(
            verify_admin_signature(&stale, BODY, &config, 1_000 + 301),
            Err(AdminAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_missing_secret_rejects_even_signed_requests() {
        let req = signed_request("", 1_000);
        assert_eq!(
            verify_admin_signature(&req, BODY, &HmacConfig::default(), 1_000),
            Err(AdminAuthError::Disabled)
        );
        assert_eq!(
            AdminAuthError::Disabled.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
