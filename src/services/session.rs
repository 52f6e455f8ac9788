//! Session issuing and validity checks.

use crate::{
    clock::{Clock, SystemClock},
    config::LockoutConfig,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use uuid::Uuid;

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub identifier: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// A session is valid strictly before its expiry instant.
pub fn is_session_valid_at(session: Option<&Session>, now: i64) -> bool {
    match session {
        Some(session) => now < session.expires_at,
        None => false,
    }
}

/// Issues sessions and answers validity checks against an injected clock
pub struct SessionManager {
    session_duration_seconds: i64,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new(config: &LockoutConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &LockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_duration_seconds: config.session_duration_seconds,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `session` is present and not yet expired
    pub fn is_session_valid(&self, session: Option<&Session>) -> bool {
        is_session_valid_at(session, self.clock.now())
    }

    /// Create and remember a new session for `identifier`
    pub fn issue(&self, identifier: &str) -> Session {
        let now = self.clock.now();
        let session = Session {
            token: format!("session_{}", Uuid::new_v4()),
            identifier: identifier.to_string(),
            issued_at: now,
            expires_at: now + self.session_duration_seconds,
        };
        self.sessions()
            .insert(session.token.clone(), session.clone());
        session
    }

    /// Look up a token; expired sessions are discarded on the way.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions();
        let session = sessions.get(token).cloned();
        if self.is_session_valid(session.as_ref()) {
            return session;
        }
        sessions.remove(token);
        None
    }

    /// Forget a session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions().remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| is_session_valid_at(Some(session), now));
        before - sessions.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session_expiring_at(expires_at: i64) -> Session {
        Session {
            token: "t".to_string(),
            identifier: "alice@example.com".to_string(),
            issued_at: expires_at - 3600,
            expires_at,
        }
    }

    #[test]
    fn test_absent_session_is_invalid() {
        assert!(!is_session_valid_at(None, 0));
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let session = session_expiring_at(1_000);
        assert!(is_session_valid_at(Some(&session), 999));
        assert!(!is_session_valid_at(Some(&session), 1_000));
        assert!(!is_session_valid_at(Some(&session), 1_001));
    }

    #[test]
    fn test_issued_session_lasts_one_hour() {
        let clock = Arc::new(ManualClock::new(50));
        let manager = SessionManager::with_clock(&LockoutConfig::default(), clock.clone());

        let session = manager.issue("alice@example.com");
        assert_eq!(session.issued_at, 50);
        assert_eq!(session.expires_at, 3650);
        assert!(session.token.starts_with("session_"));

        clock.set(3649);
        assert_eq!(manager.validate(&session.token), Some(session.clone()));

        clock.set(3650);
        assert_eq!(manager.validate(&session.token), None);
        assert_eq!(manager.active_sessions(), 0, "expired session is discarded");
    }

    #[test]
    fn test_unknown_and_revoked_tokens() {
        let manager = SessionManager::with_clock(
            &LockoutConfig::default(),
            Arc::new(ManualClock::new(0)),
        );
        assert!(manager.validate("session_missing").is_none());

        let session = manager.issue("bob");
        assert!(manager.revoke(&session.token));
        assert!(!manager.revoke(&session.token));
        assert!(manager.validate(&session.token).is_none());
    }

    #[test]
    fn test_sweep_drops_only_expired() {
        let clock = Arc::new(ManualClock::new(0));
        let manager = SessionManager::with_clock(&LockoutConfig::default(), clock.clone());
        manager.issue("early");
        clock.set(2000);
        manager.issue("late");

        clock.set(3600);
        assert_eq!(manager.sweep(), 1);
        assert_eq!(manager.active_sessions(), 1);
    }
}
