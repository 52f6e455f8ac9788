//! Per-identifier failed-login tracking with a timed lockout.
//!
//! The guard is consulted before every credential check and told the outcome
//! afterwards. `can_attempt` followed by `record_attempt` is not one atomic
//! step: two concurrent failures for the same identifier may both be counted
//! against the same pre-lockout state. That race is accepted; at worst one
//! extra attempt is let through or counted.

use crate::{
    clock::{Clock, SystemClock},
    config::LockoutConfig,
};
use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, info, warn};

/// Message shown to users whose account is locked
pub const ACCOUNT_LOCKED_MESSAGE: &str = "Account temporarily locked. Please try again later.";

/// Errors raised by the login guard
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginGuardError {
    #[error("account {identifier} is locked for another {retry_after_seconds}s")]
    AccountLocked {
        identifier: String,
        retry_after_seconds: i64,
    },
}

impl LoginGuardError {
    /// Seconds until the caller may try again
    pub fn retry_after_seconds(&self) -> i64 {
        match self {
            Self::AccountLocked {
                retry_after_seconds,
                ..
            } => *retry_after_seconds,
        }
    }
}

impl ResponseError for LoginGuardError {
    fn status_code(&self) -> StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }

    fn error_response(&self) -> HttpResponse {
        let retry_after = self.retry_after_seconds();
        HttpResponse::build(self.status_code())
            .insert_header((header::RETRY_AFTER, retry_after.to_string()))
            .json(serde_json::json!({
                "error": "Account Locked",
                "message": ACCOUNT_LOCKED_MESSAGE,
                "retry_after_seconds": retry_after,
            }))
    }
}

/// Attempt bookkeeping for one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttemptRecord {
    pub failure_count: u32,
    pub lockout_started_at: Option<i64>,
    pub last_failure_at: i64,
}

/// What `record_attempt` did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A success removed any history for the identifier
    Cleared,
    /// A failure was counted without starting a lockout
    Counted { failure_count: u32 },
    /// This failure started a new lockout episode
    LockedOut { failure_count: u32 },
}

/// Read-only snapshot of an identifier's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptStatus {
    pub failure_count: u32,
    pub remaining_attempts: u32,
    pub locked: bool,
    pub retry_after_seconds: Option<i64>,
}

/// In-memory login attempt guard
///
/// Cheap to share: wrap it in `web::Data` (or an `Arc`) and hand the same
/// instance to every handler that authenticates users.
pub struct LoginGuard {
    config: LockoutConfig,
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<String, LoginAttemptRecord>>,
}

impl LoginGuard {
    /// Create a guard backed by the system clock
    pub fn new(config: LockoutConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a guard reading time from `clock`
    pub fn with_clock(config: LockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, LoginAttemptRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seconds left in the active lockout, if any
    fn lockout_remaining(&self, record: &LoginAttemptRecord, now: i64) -> Option<i64> {
        let started = record.lockout_started_at?;
        let elapsed = now - started;
        (elapsed < self.config.lockout_duration_seconds)
            .then(|| self.config.lockout_duration_seconds - elapsed)
    }

    /// Decide whether `identifier` may attempt a login now.
    ///
    /// Returns `Err(AccountLocked)` while a lockout is active. Once the lockout
    /// window has passed the next attempt is allowed, but the failure count is
    /// left untouched: only a success or `clear_attempts` resets it.
    pub fn can_attempt(&self, identifier: &str) -> Result<bool, LoginGuardError> {
        let records = self.records();
        let Some(record) = records.get(identifier) else {
            return Ok(true);
        };

        let now = self.clock.now();
        if let Some(retry_after_seconds) = self.lockout_remaining(record, now) {
            debug!(identifier, retry_after_seconds, "Login attempt rejected by lockout");
            return Err(LoginGuardError::AccountLocked {
                identifier: identifier.to_string(),
                retry_after_seconds,
            });
        }

        if record.lockout_started_at.is_some() {
            return Ok(true);
        }

        Ok(record.failure_count < self.config.max_attempts)
    }

    /// Record the outcome of a login attempt
    pub fn record_attempt(&self, identifier: &str, success: bool) -> AttemptOutcome {
        let mut records = self.records();

        if success {
            if records.remove(identifier).is_some() {
                debug!(identifier, "Successful login cleared failure history");
            }
            return AttemptOutcome::Cleared;
        }

        let now = self.clock.now();
        let record = records
            .entry(identifier.to_string())
            .or_insert(LoginAttemptRecord {
                failure_count: 0,
                lockout_started_at: None,
                last_failure_at: now,
            });

        record.failure_count = record.failure_count.saturating_add(1);
        record.last_failure_at = now;

        let already_locked = self.lockout_remaining(record, now).is_some();
        if record.failure_count >= self.config.max_attempts && !already_locked {
            record.lockout_started_at = Some(now);
            warn!(
                identifier,
                failures = record.failure_count,
                lockout_secs = self.config.lockout_duration_seconds,
                "Failure threshold reached, locking account"
            );
            return AttemptOutcome::LockedOut {
                failure_count: record.failure_count,
            };
        }

        debug!(
            identifier,
            failures = record.failure_count,
            max = self.config.max_attempts,
            "Failed login counted"
        );
        AttemptOutcome::Counted {
            failure_count: record.failure_count,
        }
    }

    /// Remove all history for `identifier`. Returns whether anything was removed.
    pub fn clear_attempts(&self, identifier: &str) -> bool {
        let removed = self.records().remove(identifier).is_some();
        if removed {
            info!(identifier, "Login attempts cleared");
        }
        removed
    }

    /// Snapshot of the identifier's current state
    pub fn status(&self, identifier: &str) -> AttemptStatus {
        let records = self.records();
        let now = self.clock.now();

        match records.get(identifier) {
            None => AttemptStatus {
                failure_count: 0,
                remaining_attempts: self.config.max_attempts,
                locked: false,
                retry_after_seconds: None,
            },
            Some(record) => {
                let retry_after_seconds = self.lockout_remaining(record, now);
                AttemptStatus {
                    failure_count: record.failure_count,
                    remaining_attempts: self
                        .config
                        .max_attempts
                        .saturating_sub(record.failure_count),
                    locked: retry_after_seconds.is_some(),
                    retry_after_seconds,
                }
            }
        }
    }

    /// Evict idle records that are not inside an active lockout.
    ///
    /// A record is idle once its last failure is older than the configured
    /// retention. Returns the number of evicted records.
    pub fn sweep(&self) -> usize {
        let mut records = self.records();
        let now = self.clock.now();
        let before = records.len();

        records.retain(|_, record| {
            self.lockout_remaining(record, now).is_some()
                || now - record.last_failure_at < self.config.record_retention_seconds
        });

        before - records.len()
    }

    /// Number of identifiers with recorded history
    pub fn tracked_identifiers(&self) -> usize {
        self.records().len()
    }
}

impl Default for LoginGuard {
    fn default() -> Self {
        Self::new(LockoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn guard_at(start: i64) -> (LoginGuard, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let guard = LoginGuard::with_clock(LockoutConfig::default(), clock.clone());
        (guard, clock)
    }

    #[test]
    fn test_threshold_reports_lockout_once() {
        let (guard, _clock) = guard_at(0);
        for expected in 1..5 {
            assert_eq!(
                guard.record_attempt("bob", false),
                AttemptOutcome::Counted {
                    failure_count: expected
                }
            );
        }
        assert_eq!(
            guard.record_attempt("bob", false),
            AttemptOutcome::LockedOut { failure_count: 5 }
        );
        assert_eq!(
            guard.record_attempt("bob", false),
            AttemptOutcome::Counted { failure_count: 6 }
        );
    }

    #[test]
    fn test_lockout_start_not_overwritten_while_active() {
        let (guard, clock) = guard_at(0);
        for _ in 0..5 {
            guard.record_attempt("bob", false);
        }
        clock.set(500);
        guard.record_attempt("bob", false);

        // Still measured from t=0, so 400 seconds remain.
        let err = guard.can_attempt("bob").unwrap_err();
        assert_eq!(err.retry_after_seconds(), 400);
    }

    #[test]
    fn test_failure_after_expired_lockout_relocks() {
        let (guard, clock) = guard_at(0);
        for _ in 0..5 {
            guard.record_attempt("bob", false);
        }
        clock.set(1000);
        assert_eq!(guard.can_attempt("bob"), Ok(true));

        assert_eq!(
            guard.record_attempt("bob", false),
            AttemptOutcome::LockedOut { failure_count: 6 }
        );
        assert!(guard.can_attempt("bob").is_err());
    }

    #[test]
    fn test_threshold_always_locks_rather_than_refusing() {
        // Every refusal is an AccountLocked carrying a retry time.
        for max_attempts in 1..=5 {
            let config = LockoutConfig {
                max_attempts,
                lockout_duration_seconds: 30,
                ..LockoutConfig::default()
            };
            let clock = Arc::new(ManualClock::new(0));
            let guard = LoginGuard::with_clock(config, clock.clone());

            for step in 0..40 {
                clock.set(step * 7);
                assert_ne!(
                    guard.can_attempt("bob"),
                    Ok(false),
                    "max_attempts={max_attempts} step={step}"
                );
                guard.record_attempt("bob", false);
            }
        }
    }

    #[test]
    fn test_status_snapshot() {
        let (guard, clock) = guard_at(10);
        assert_eq!(guard.status("carol").remaining_attempts, 5);

        guard.record_attempt("carol", false);
        guard.record_attempt("carol", false);
        let status = guard.status("carol");
        assert_eq!(status.failure_count, 2);
        assert_eq!(status.remaining_attempts, 3);
        assert!(!status.locked);

        for _ in 0..3 {
            guard.record_attempt("carol", false);
        }
        clock.advance(100);
        let status = guard.status("carol");
        assert!(status.locked);
        assert_eq!(status.remaining_attempts, 0);
        assert_eq!(status.retry_after_seconds, Some(800));
    }

    #[test]
    fn test_error_response_is_too_many_requests() {
        let err = LoginGuardError::AccountLocked {
            identifier: "bob".to_string(),
            retry_after_seconds: 42,
        };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );
    }
}
