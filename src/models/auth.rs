//! Authentication-related data models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Request model for user login
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct LoginRequest {
    /// Account identifier, usually an email address
    pub identifier: String,
    pub password: String,
}

/// Response model for login attempts
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct LoginResponse {
    pub success: bool,
    pub session_token: Option<String>,
    /// Unix seconds at which the session expires
    pub expires_at: Option<i64>,
    /// Failed attempts left before the account is locked
    pub remaining_attempts: Option<u32>,
    pub message: String,
}

/// Request model carrying only an account identifier
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct IdentifierRequest {
    pub identifier: String,
}

/// Response model for administrative unlock
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct UnlockResponse {
    pub identifier: String,
    /// Whether any attempt history existed
    pub cleared: bool,
}

/// Response model for attempt status queries
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct AttemptStatusResponse {
    pub identifier: String,
    pub failure_count: u32,
    pub remaining_attempts: u32,
    pub locked: bool,
    pub retry_after_seconds: Option<i64>,
}

/// Request model for session validation
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct SessionValidationRequest {
    pub session_token: String,
}

/// Response model for session validation
#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct SessionValidationResponse {
    pub valid: bool,
    pub identifier: Option<String>,
    pub expires_at: Option<i64>,
    pub message: String,
}
