//! Metrics endpoint handler.

use crate::services::AppMetrics;
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Prometheus metrics endpoint
///
/// Responds 503 when the server was started with metrics disabled.
#[api_v2_operation(
    summary = "Prometheus Metrics Endpoint",
    description = "Returns login attempt, lockout and HTTP metrics in Prometheus text format.",
    tags("Metrics"),
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 503, description = "Metrics collection disabled")
    )
)]
pub async fn get_metrics(req: HttpRequest) -> Result<HttpResponse, Error> {
    let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() else {
        return Ok(HttpResponse::ServiceUnavailable()
            .content_type("text/plain")
            .body("Metrics collection is disabled"));
    };

    match metrics.render() {
        Ok(metrics_output) => Ok(HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(metrics_output)),
        Err(e) => Err(actix_web::error::ErrorInternalServerError(format!(
            "Failed to render metrics: {}",
            e
        ))),
    }
}
