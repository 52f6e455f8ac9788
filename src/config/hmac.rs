//! HMAC signature configuration for the administrative endpoints.

use std::env;

/// Default accepted clock skew between signer and server (5 minutes)
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECONDS: i64 = 300;

/// Configuration for HMAC signature validation
///
/// Administrative requests are always signed. Without a secret they are
/// rejected outright.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HmacConfig {
    pub secret: Option<String>,
    pub timestamp_tolerance_seconds: i64,
}

impl Default for HmacConfig {
    fn default() -> Self {
        Self {
            secret: None,
            timestamp_tolerance_seconds: DEFAULT_TIMESTAMP_TOLERANCE_SECONDS,
        }
    }
}

impl HmacConfig {
    /// Config with the given shared secret and default tolerance
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// A blank `HMAC_SECRET` counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("HMAC_SECRET").filter(|v| !v.trim().is_empty());

        let timestamp_tolerance_seconds = lookup("HMAC_TIMESTAMP_TOLERANCE")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TIMESTAMP_TOLERANCE_SECONDS);

        Self {
            secret,
            timestamp_tolerance_seconds,
        }
    }

    /// Whether signed administrative requests can be accepted at all
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }
}
