//! Authentication endpoint handlers.
//!
//! The login handler is the guard's main call site: it consults
//! `can_attempt` before verifying credentials and reports the outcome with
//! `record_attempt` afterwards. The administrative endpoints read the raw
//! body so its HMAC signature can be checked before anything is parsed.

use crate::{
    clock::Clock,
    config::MAX_IDENTIFIER_LENGTH,
    models::{
        audit::{AuthAuditEvent, AuthEventOutcome, AuthEventType},
        auth::{
            AttemptStatusResponse, IdentifierRequest, LoginRequest, LoginResponse,
            SessionValidationRequest, SessionValidationResponse, UnlockResponse,
        },
    },
    services::{AppMetrics, AttemptOutcome, LoginGuardError, verify_admin_signature},
    state::AuthState,
    utils::http::RequestContext,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, error::InternalError, web};
use paperclip::actix::api_v2_operation;
use serde::de::DeserializeOwned;

fn auth_state(req: &HttpRequest) -> Result<&web::Data<AuthState>, Error> {
    req.app_data::<web::Data<AuthState>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Auth services not configured"))
}

fn audit(ctx: &RequestContext, event_type: AuthEventType, outcome: AuthEventOutcome) -> AuthAuditEvent {
    AuthAuditEvent::new(event_type, outcome, ctx.ip_address.clone(), ctx.endpoint.clone())
        .with_user_agent(ctx.user_agent.clone())
        .with_request_id(ctx.request_id.clone())
}

fn bad_request(message: String) -> Error {
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Bad Request",
        "message": message,
    }));
    InternalError::from_response(message, response).into()
}

/// Refuse identifiers too long to be real accounts before they reach the guard
fn check_identifier(identifier: &str) -> Result<(), Error> {
    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(bad_request(format!(
            "Identifier must be at most {MAX_IDENTIFIER_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Check the admin signature over `body`, then parse it
fn signed_payload<T: DeserializeOwned>(
    req: &HttpRequest,
    state: &AuthState,
    ctx: &RequestContext,
    body: &[u8],
) -> Result<T, Error> {
    if let Err(err) = verify_admin_signature(req, body, &state.hmac, state.clock.now()) {
        audit(ctx, AuthEventType::AdminRequestRejected, AuthEventOutcome::Failure).log();
        return Err(err.into());
    }

    serde_json::from_slice(body).map_err(|e| bad_request(format!("Invalid request body: {e}")))
}

/// User login endpoint
///
/// Rejects the attempt with 429 while the account is locked, otherwise checks
/// the credentials and records the outcome against the identifier.
#[api_v2_operation(
    summary = "User Login",
    description = "Authenticate a user, subject to failed-attempt lockout, and issue a session",
    tags("Authentication"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Identifier too long"),
        (status = 401, description = "Invalid credentials", body = LoginResponse),
        (status = 429, description = "Account temporarily locked")
    )
)]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<LoginRequest>,
) -> Result<web::Json<LoginResponse>, Error> {
    let state = auth_state(&req)?;
    let metrics = req.app_data::<web::Data<AppMetrics>>();
    let ctx = RequestContext::from_request(&req);
    let identifier = payload.identifier.as_str();
    check_identifier(identifier)?;

    let rejection = match state.guard.can_attempt(identifier) {
        Ok(true) => None,
        // Reaching the threshold always starts a lockout, so `false` is not
        // expected from the guard; answer it as a fresh full-length lockout.
        Ok(false) => Some(LoginGuardError::AccountLocked {
            identifier: identifier.to_string(),
            retry_after_seconds: state.guard.config().lockout_duration_seconds,
        }),
        Err(err) => Some(err),
    };

    if let Some(err) = rejection {
        audit(&ctx, AuthEventType::LoginRejectedLocked, AuthEventOutcome::Failure)
            .with_identifier(identifier)
            .with_retry_after(err.retry_after_seconds())
            .log();
        if let Some(metrics) = metrics {
            metrics.record_rejected();
        }
        return Err(err.into());
    }

    let success = state.verifier.verify(identifier, &payload.password);
    let outcome = state.guard.record_attempt(identifier, success);

    if let Some(metrics) = metrics {
        metrics.record_attempt(outcome);
        metrics.set_table_sizes(
            state.guard.tracked_identifiers(),
            state.sessions.active_sessions(),
        );
    }

    if success {
        let session = state.sessions.issue(identifier);

        audit(&ctx, AuthEventType::LoginSuccess, AuthEventOutcome::Success)
            .with_identifier(identifier)
            .log();

        return Ok(web::Json(LoginResponse {
            success: true,
            session_token: Some(session.token),
            expires_at: Some(session.expires_at),
            remaining_attempts: None,
            message: "Login successful".to_string(),
        }));
    }

    let event_type = match outcome {
        AttemptOutcome::LockedOut { .. } => AuthEventType::LockoutTriggered,
        _ => AuthEventType::LoginFailure,
    };
    let status = state.guard.status(identifier);
    let mut event = audit(&ctx, event_type, AuthEventOutcome::Failure)
        .with_identifier(identifier)
        .with_failure_count(status.failure_count);
    if let Some(retry_after) = status.retry_after_seconds {
        event = event.with_retry_after(retry_after);
    }
    event.log();

    let response = LoginResponse {
        success: false,
        session_token: None,
        expires_at: None,
        remaining_attempts: Some(status.remaining_attempts),
        message: "Invalid credentials".to_string(),
    };
    Err(InternalError::from_response(
        "Invalid credentials",
        HttpResponse::Unauthorized().json(response),
    )
    .into())
}

/// Administrative unlock endpoint
///
/// Clears every recorded failure for the identifier. Calling it for an
/// identifier without history succeeds with `cleared: false`. The body must
/// be signed with `HMAC_SECRET`.
#[api_v2_operation(
    summary = "Clear Login Attempts",
    description = "Remove failed-attempt history and any lockout for an identifier. \
                   Requires `X-Timestamp` and an `X-Signature` HMAC-SHA256 of `{timestamp}.{body}`.",
    tags("Authentication"),
    responses(
        (status = 200, description = "Attempts cleared", body = UnlockResponse),
        (status = 400, description = "Malformed body or identifier too long"),
        (status = 401, description = "Missing or invalid signature")
    )
)]
pub async fn unlock(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<UnlockResponse>, Error> {
    let state = auth_state(&req)?;
    let ctx = RequestContext::from_request(&req);
    let payload: IdentifierRequest = signed_payload(&req, state, &ctx, &body)?;
    check_identifier(&payload.identifier)?;

    let cleared = state.guard.clear_attempts(&payload.identifier);

    audit(&ctx, AuthEventType::AttemptsCleared, AuthEventOutcome::Success)
        .with_identifier(payload.identifier.as_str())
        .log();

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.set_table_sizes(
            state.guard.tracked_identifiers(),
            state.sessions.active_sessions(),
        );
    }

    Ok(web::Json(UnlockResponse {
        identifier: payload.identifier,
        cleared,
    }))
}

/// Attempt status endpoint
///
/// Requires the same signature as [`unlock`].
#[api_v2_operation(
    summary = "Login Attempt Status",
    description = "Report failure count and lockout state for an identifier. \
                   Requires `X-Timestamp` and an `X-Signature` HMAC-SHA256 of `{timestamp}.{body}`.",
    tags("Authentication"),
    responses(
        (status = 200, description = "Current attempt status", body = AttemptStatusResponse),
        (status = 400, description = "Malformed body or identifier too long"),
        (status = 401, description = "Missing or invalid signature")
    )
)]
pub async fn attempt_status(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<web::Json<AttemptStatusResponse>, Error> {
    let state = auth_state(&req)?;
    let ctx = RequestContext::from_request(&req);
    let payload: IdentifierRequest = signed_payload(&req, state, &ctx, &body)?;
    check_identifier(&payload.identifier)?;

    let status = state.guard.status(&payload.identifier);

    Ok(web::Json(AttemptStatusResponse {
        identifier: payload.identifier,
        failure_count: status.failure_count,
        remaining_attempts: status.remaining_attempts,
        locked: status.locked,
        retry_after_seconds: status.retry_after_seconds,
    }))
}

/// Session validation endpoint
///
/// Used when bootstrapping a stored session: an invalid or expired session
/// means the client must authenticate again.
#[api_v2_operation(
    summary = "Session Validation",
    description = "Check whether a previously issued session is still valid",
    tags("Authentication"),
    responses(
        (status = 200, description = "Session validation result", body = SessionValidationResponse)
    )
)]
pub async fn validate_session(
    req: HttpRequest,
    payload: web::Json<SessionValidationRequest>,
) -> Result<web::Json<SessionValidationResponse>, Error> {
    let state = auth_state(&req)?;
    let ctx = RequestContext::from_request(&req);

    let response = match state.sessions.validate(&payload.session_token) {
        Some(session) => {
            audit(&ctx, AuthEventType::SessionValid, AuthEventOutcome::Success)
                .with_identifier(session.identifier.as_str())
                .log();
            SessionValidationResponse {
                valid: true,
                identifier: Some(session.identifier),
                expires_at: Some(session.expires_at),
                message: "Session is valid".to_string(),
            }
        }
        None => {
            audit(&ctx, AuthEventType::SessionInvalid, AuthEventOutcome::Failure).log();
            SessionValidationResponse {
                valid: false,
                identifier: None,
                expires_at: None,
                message: "Session is invalid or expired".to_string(),
            }
        }
    };

    Ok(web::Json(response))
}
