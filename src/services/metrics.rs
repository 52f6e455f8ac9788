//! Prometheus metrics for login traffic and guard state.

use crate::services::login_guard::AttemptOutcome;
use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounter, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::{Duration, Instant};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub login_attempts_total: CounterVec,
    pub lockouts_total: IntCounter,
    pub tracked_identifiers: IntGauge,
    pub active_sessions: IntGauge,
    pub app_uptime_seconds: Gauge,
    pub start_time: Instant,
}

impl AppMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["method", "route"],
        )?;

        // outcome: success | failure | locked
        let login_attempts_total = CounterVec::new(
            Opts::new("login_attempts_total", "Login attempts by outcome"),
            &["outcome"],
        )?;

        let lockouts_total = IntCounter::new(
            "login_lockouts_total",
            "Lockout episodes started after reaching the failure threshold",
        )?;

        let tracked_identifiers = IntGauge::new(
            "login_tracked_identifiers",
            "Identifiers with recorded failed attempts",
        )?;

        let active_sessions = IntGauge::new("login_active_sessions", "Sessions held in memory")?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(login_attempts_total.clone()))?;
        registry.register(Box::new(lockouts_total.clone()))?;
        registry.register(Box::new(tracked_identifiers.clone()))?;
        registry.register(Box::new(active_sessions.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            login_attempts_total,
            lockouts_total,
            tracked_identifiers,
            active_sessions,
            app_uptime_seconds,
            start_time: Instant::now(),
        })
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Count a login attempt the guard has seen
    pub fn record_attempt(&self, outcome: AttemptOutcome) {
        let label = match outcome {
            AttemptOutcome::Cleared => "success",
            AttemptOutcome::Counted { .. } => "failure",
            AttemptOutcome::LockedOut { .. } => {
                self.lockouts_total.inc();
                "failure"
            }
        };
        self.login_attempts_total.with_label_values(&[label]).inc();
    }

    /// Count an attempt rejected before credentials were checked
    pub fn record_rejected(&self) {
        self.login_attempts_total.with_label_values(&["locked"]).inc();
    }

    /// Refresh table-size gauges
    pub fn set_table_sizes(&self, tracked_identifiers: usize, active_sessions: usize) {
        self.tracked_identifiers.set(tracked_identifiers as i64);
        self.active_sessions.set(active_sessions as i64);
    }

    pub fn update_uptime(&self) {
        self.app_uptime_seconds
            .set(self.start_time.elapsed().as_secs_f64());
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_outcomes_are_counted() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_attempt(AttemptOutcome::Counted { failure_count: 1 });
        metrics.record_attempt(AttemptOutcome::LockedOut { failure_count: 5 });
        metrics.record_attempt(AttemptOutcome::Cleared);
        metrics.record_rejected();

        let failures = metrics.login_attempts_total.with_label_values(&["failure"]);
        assert_eq!(failures.get(), 2.0);
        assert_eq!(metrics.lockouts_total.get(), 1);

        let output = metrics.render().unwrap();
        assert!(output.contains("login_attempts_total{outcome=\"locked\"} 1"));
        assert!(output.contains("login_lockouts_total 1"));
    }

    #[test]
    fn test_metrics_endpoint_not_recorded() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_request("GET", "/api/metrics", 200, Duration::from_millis(1));
        metrics.record_request("POST", "/auth/login", 401, Duration::from_millis(3));

        let output = metrics.render().unwrap();
        assert!(!output.contains("route=\"/api/metrics\""));
        assert!(output.contains("route=\"/auth/login\""));
    }
}
