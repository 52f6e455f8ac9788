//! Login lockout and session lifetime configuration.

use std::env;

/// Consecutive failed attempts that trigger a lockout
pub const MAX_ATTEMPTS: u32 = 5;

/// How long an account stays locked once the threshold is reached (15 minutes)
pub const LOCKOUT_DURATION_SECONDS: i64 = 900;

/// Lifetime of an issued session (1 hour)
pub const SESSION_DURATION_SECONDS: i64 = 3600;

/// How long an idle, unlocked attempt record is kept before the sweeper drops it
pub const RECORD_RETENTION_SECONDS: i64 = 86_400;

/// Longest identifier, in bytes, the HTTP endpoints accept (RFC 5321 mailbox limit)
pub const MAX_IDENTIFIER_LENGTH: usize = 320;

/// Configuration for the login guard and session manager
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockoutConfig {
    pub max_attempts: u32,
    pub lockout_duration_seconds: i64,
    pub session_duration_seconds: i64,
    pub record_retention_seconds: i64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            lockout_duration_seconds: LOCKOUT_DURATION_SECONDS,
            session_duration_seconds: SESSION_DURATION_SECONDS,
            record_retention_seconds: RECORD_RETENTION_SECONDS,
        }
    }
}

impl LockoutConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Unparseable or non-positive values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |key: &str, default: i64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        let max_attempts = lookup("LOGIN_MAX_ATTEMPTS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(MAX_ATTEMPTS);

        Self {
            max_attempts,
            lockout_duration_seconds: positive(
                "LOGIN_LOCKOUT_DURATION_SECONDS",
                LOCKOUT_DURATION_SECONDS,
            ),
            session_duration_seconds: positive(
                "LOGIN_SESSION_DURATION_SECONDS",
                SESSION_DURATION_SECONDS,
            ),
            record_retention_seconds: positive(
                "LOGIN_RECORD_RETENTION_SECONDS",
                RECORD_RETENTION_SECONDS,
            ),
        }
    }
}
