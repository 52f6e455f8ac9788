//! Login Guard - failed-login lockout and session checks behind a small API
//!
//! The core is [`LoginGuard`]: it counts consecutive failed logins per
//! identifier, locks the identifier for a fixed window once the threshold is
//! reached, and is cleared by a successful login or an administrative unlock.
//! [`SessionManager`] issues sessions and answers validity checks.
//!
//! ## Architecture
//!
//! - `clock` - injectable time source
//! - `config` - lockout constants, admin signing, trusted proxies and environment loading
//! - `services` - login guard, sessions, credential verification, admin signatures, metrics, sweeper
//! - `models` - request/response models and audit events
//! - `handlers` - HTTP endpoints and the app factory
//! - `middleware` - request ID and request metrics
//! - `utils` - request inspection and HMAC helpers
//!
//! ## Quick Start
//!
//! ```
//! use login_guard::{LockoutConfig, LoginGuard};
//!
//! let guard = LoginGuard::new(LockoutConfig::default());
//! assert_eq!(guard.can_attempt("alice@example.com"), Ok(true));
//! for _ in 0..5 {
//!     guard.record_attempt("alice@example.com", false);
//! }
//! assert!(guard.can_attempt("alice@example.com").is_err());
//! ```

pub mod clock;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    HmacConfig, LOCKOUT_DURATION_SECONDS, LockoutConfig, LogFormat, MAX_ATTEMPTS,
    MAX_IDENTIFIER_LENGTH, MAX_REQUEST_BODY_BYTES, SESSION_DURATION_SECONDS, ServerConfig,
    TrustedProxies,
};
pub use handlers::{
    attempt_status, create_app, create_base_app, create_openapi_spec, get_metrics, health, login,
    unlock, validate_session,
};
pub use middleware::{RequestId, RequestTracing};
pub use models::{
    AttemptStatusResponse, AuthAuditEvent, AuthEventOutcome, AuthEventType, HealthResponse,
    IdentifierRequest, LoginRequest, LoginResponse, SessionValidationRequest,
    SessionValidationResponse, UnlockResponse,
};
pub use services::{
    ACCOUNT_LOCKED_MESSAGE, AdminAuthError, AppMetrics, AttemptOutcome, AttemptStatus,
    CredentialVerifier, LoginAttemptRecord, LoginGuard, LoginGuardError, SIGNATURE_HEADER,
    Session, SessionManager, StaticCredentialVerifier, SweepReport, TIMESTAMP_HEADER,
    is_session_valid_at, spawn_sweeper, sweep_once, verify_admin_signature,
};
pub use state::AuthState;
pub use utils::hmac::generate_signature;
pub use utils::{RequestContext, extract_client_ip, extract_route_pattern, extract_user_agent};
