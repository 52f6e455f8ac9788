//! OpenAPI specification generation and app factory.

use crate::{
    config::MAX_REQUEST_BODY_BYTES,
    handlers::{attempt_status, get_metrics, health, login, unlock, validate_session},
    middleware::RequestTracing,
    services::AppMetrics,
    state::AuthState,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use tracing::warn;

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Login Guard API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Login endpoint protected by a per-identifier failed-attempt lockout.\n\n\
                ## Lockout policy\n\
                - After `LOGIN_MAX_ATTEMPTS` (default 5) consecutive failures the identifier is locked.\n\
                - While locked, `POST /auth/login` answers `429 Too Many Requests` with a `Retry-After` header.\n\
                - The lockout lasts `LOGIN_LOCKOUT_DURATION_SECONDS` (default 900).\n\
                - A successful login or `POST /auth/unlock` resets the failure count; waiting out the\n\
                  lockout does not, so one more failure after expiry locks the identifier again.\n\
                \n\
                ## Administrative endpoints\n\
                `POST /auth/unlock` and `POST /auth/status` require an `X-Timestamp` header (unix seconds)\n\
                and an `X-Signature` header holding the hex HMAC-SHA256 of `{timestamp}.{body}` keyed\n\
                with `HMAC_SECRET`. Without a configured secret they always answer 401.\n\
                \n\
                ## Sessions\n\
                Successful logins return a session token valid for `LOGIN_SESSION_DURATION_SECONDS`\n\
                (default 3600). `POST /auth/session/validate` reports whether it is still valid."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application from explicit services.
///
/// Pass `None` for `metrics` to disable `/api/metrics` and request metrics.
/// Request bodies are capped at [`MAX_REQUEST_BODY_BYTES`].
pub fn create_app(
    state: AuthState,
    metrics: Option<web::Data<AppMetrics>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(web::JsonConfig::default().limit(MAX_REQUEST_BODY_BYTES))
        .app_data(web::PayloadConfig::new(MAX_REQUEST_BODY_BYTES))
        .app_data(web::Data::new(state.trusted_proxies.clone()))
        .app_data(web::Data::new(state));
    let app = match metrics {
        Some(metrics) => app.app_data(metrics),
        None => app,
    };

    app.wrap(RequestTracing)
        .wrap_api_with_spec(create_openapi_spec())
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/unlock").route(web::post().to(unlock)))
        .service(web::resource("/auth/status").route(web::post().to(attempt_status)))
        .service(
            web::resource("/auth/session/validate").route(web::post().to(validate_session)),
        )
        .with_json_spec_at("/api/spec/v2")
        .build()
}

/// Creates an app with services configured from the environment
///
/// Each call builds fresh attempt and session tables; the server binary
/// shares one `AuthState` across workers through [`create_app`] instead.
pub fn create_base_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let metrics = match AppMetrics::new() {
        Ok(metrics) => Some(web::Data::new(metrics)),
        Err(e) => {
            warn!(error = %e, "Failed to create metrics, continuing without them");
            None
        }
    };

    create_app(AuthState::from_env(), metrics)
}
