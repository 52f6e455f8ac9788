//! Shared services handed to the HTTP handlers.

use crate::{
    clock::{Clock, SystemClock},
    config::{HmacConfig, LockoutConfig, TrustedProxies},
    services::{CredentialVerifier, LoginGuard, SessionManager, StaticCredentialVerifier},
};
use std::sync::Arc;

/// Services used by the authentication endpoints.
///
/// Cloning is cheap; every clone shares the same attempt and session tables.
#[derive(Clone)]
pub struct AuthState {
    pub guard: Arc<LoginGuard>,
    pub sessions: Arc<SessionManager>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub clock: Arc<dyn Clock>,
    /// Signing secret for `/auth/unlock` and `/auth/status`
    pub hmac: HmacConfig,
    pub trusted_proxies: TrustedProxies,
}

impl AuthState {
    pub fn new(
        guard: Arc<LoginGuard>,
        sessions: Arc<SessionManager>,
        verifier: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            guard,
            sessions,
            verifier,
            clock,
            hmac: HmacConfig::default(),
            trusted_proxies: TrustedProxies::default(),
        }
    }

    /// Build guard and session manager from one config and clock.
    ///
    /// Administrative endpoints stay disabled until [`AuthState::with_hmac`].
    pub fn with_clock(
        config: LockoutConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let sessions = SessionManager::with_clock(&config, clock.clone());
        let guard = LoginGuard::with_clock(config, clock.clone());
        Self::new(Arc::new(guard), Arc::new(sessions), verifier, clock)
    }

    pub fn with_hmac(mut self, hmac: HmacConfig) -> Self {
        self.hmac = hmac;
        self
    }

    pub fn with_trusted_proxies(mut self, trusted_proxies: TrustedProxies) -> Self {
        self.trusted_proxies = trusted_proxies;
        self
    }

    /// Wall-clock state configured from `LOGIN_*`, `AUTH_USERS`, `HMAC_*`
    /// and `TRUSTED_PROXIES`
    pub fn from_env() -> Self {
        Self::with_clock(
            LockoutConfig::from_env(),
            Arc::new(SystemClock),
            Arc::new(StaticCredentialVerifier::from_env()),
        )
        .with_hmac(HmacConfig::from_env())
        .with_trusted_proxies(TrustedProxies::from_env())
    }
}
