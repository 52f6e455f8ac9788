//! Audit logging data structures and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of authentication events for audit logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    LoginSuccess,
    LoginFailure,
    LockoutTriggered,
    LoginRejectedLocked,
    AttemptsCleared,
    AdminRequestRejected,
    SessionValid,
    SessionInvalid,
}

/// Outcomes of authentication events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for authentication events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAuditEvent {
    pub event_type: AuthEventType,
    pub outcome: AuthEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub identifier: Option<String>,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub failure_count: Option<u32>,
    pub retry_after_seconds: Option<i64>,
}

impl AuthAuditEvent {
    pub fn new(
        event_type: AuthEventType,
        outcome: AuthEventOutcome,
        ip_address: String,
        endpoint: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            ip_address,
            user_agent: None,
            identifier: None,
            endpoint,
            request_id: None,
            failure_count: None,
            retry_after_seconds: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_failure_count(mut self, failure_count: u32) -> Self {
        self.failure_count = Some(failure_count);
        self
    }

    pub fn with_retry_after(mut self, retry_after_seconds: i64) -> Self {
        self.retry_after_seconds = Some(retry_after_seconds);
        self
    }

    /// Emit the event on the `auth_audit` target.
    ///
    /// Lockout-related events and refused admin requests are logged at warn level.
    pub fn log(&self) {
        match self.event_type {
            AuthEventType::LockoutTriggered
            | AuthEventType::LoginRejectedLocked
            | AuthEventType::AdminRequestRejected => warn!(
                target: "auth_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                ip_address = %self.ip_address,
                user_agent = ?self.user_agent,
                identifier = ?self.identifier,
                endpoint = %self.endpoint,
                request_id = ?self.request_id,
                failure_count = ?self.failure_count,
                retry_after_seconds = ?self.retry_after_seconds,
                "Authentication audit event"
            ),
            _ => info!(
                target: "auth_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                ip_address = %self.ip_address,
                user_agent = ?self.user_agent,
                identifier = ?self.identifier,
                endpoint = %self.endpoint,
                request_id = ?self.request_id,
                failure_count = ?self.failure_count,
                retry_after_seconds = ?self.retry_after_seconds,
                "Authentication audit event"
            ),
        }
    }
}
