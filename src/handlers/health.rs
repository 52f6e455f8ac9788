//! Health check endpoint handler.

use crate::{models::HealthResponse, state::AuthState};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Reports liveness together with the sizes of the in-memory tables, which
/// is the first thing to look at when memory grows.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the health status and in-memory table sizes in JSON format.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let (tracked_identifiers, active_sessions) = req
        .app_data::<web::Data<AuthState>>()
        .map(|state| {
            (
                state.guard.tracked_identifiers() as u64,
                state.sessions.active_sessions() as u64,
            )
        })
        .unwrap_or_default();

    Ok(web::Json(HealthResponse {
        status: "healthy".to_string(),
        tracked_identifiers,
        active_sessions,
    }))
}
