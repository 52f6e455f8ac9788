use actix_web::{HttpServer, web};
use login_guard::{
    AppMetrics, AuthState, ServerConfig, create_app, logging::init_tracing, spawn_sweeper,
};
use std::time::Duration;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let server_config = ServerConfig::from_env();
    if let Err(e) = init_tracing(server_config.log_format) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let state = AuthState::from_env();
    info!(
        max_attempts = state.guard.config().max_attempts,
        lockout_secs = state.guard.config().lockout_duration_seconds,
        session_secs = state.guard.config().session_duration_seconds,
        "Login guard configured"
    );
    if !state.hmac.is_enabled() {
        warn!("HMAC_SECRET not set, /auth/unlock and /auth/status will reject every request");
    }

    let metrics = if server_config.metrics_enabled {
        match AppMetrics::new() {
            Ok(metrics) => Some(web::Data::new(metrics)),
            Err(e) => {
                warn!(error = %e, "Failed to create metrics, continuing without them");
                None
            }
        }
    } else {
        None
    };

    let sweeper = spawn_sweeper(
        state.guard.clone(),
        state.sessions.clone(),
        metrics.as_ref().map(|m| m.clone().into_inner()),
        Duration::from_secs(server_config.sweep_interval_seconds),
    );

    info!(bind_address = %server_config.bind_address, "Starting server");

    let result = HttpServer::new(move || create_app(state.clone(), metrics.clone()))
        .bind(&server_config.bind_address)?
        .run()
        .await;

    sweeper.abort();
    result
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use login_guard::health;

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().route("/api/health", web::get().to(health))).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("healthy"));
    }
}
