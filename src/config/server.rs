//! HTTP server, logging and housekeeping configuration.

use std::{env, path::Path};

const LOCAL_BIND_ADDRESS: &str = "127.0.0.1:8080";
const CONTAINER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Largest request body any endpoint accepts
pub const MAX_REQUEST_BODY_BYTES: usize = 4 * 1024;

/// Output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration for the server process
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub metrics_enabled: bool,
    pub sweep_interval_seconds: u64,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: LOCAL_BIND_ADDRESS.to_string(),
            metrics_enabled: true,
            sweep_interval_seconds: 300,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let in_container = is_container_environment(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            Path::new("/.dockerenv").exists(),
        );

        let bind_address = resolve_bind_address(env::var("BIND_ADDRESS").ok(), in_container);

        let metrics_enabled = env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let sweep_interval_seconds = env::var("LOGIN_SWEEP_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(300);

        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            bind_address,
            metrics_enabled,
            sweep_interval_seconds,
            log_format,
        }
    }
}

/// Whether the process runs under Kubernetes or Docker
pub fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

/// An explicit override always wins; containers listen on all interfaces
pub fn resolve_bind_address(bind_override: Option<String>, in_container: bool) -> String {
    match bind_override {
        Some(bind) if !bind.trim().is_empty() => bind,
        _ if in_container => CONTAINER_BIND_ADDRESS.to_string(),
        _ => LOCAL_BIND_ADDRESS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_detection() {
        assert_eq!(
            resolve_bind_address(None, false),
            "127.0.0.1:8080",
            "Should bind to localhost for local development"
        );
        assert_eq!(
            resolve_bind_address(None, true),
            "0.0.0.0:8080",
            "Should bind to all interfaces in a container"
        );
        assert_eq!(
            resolve_bind_address(Some("192.168.1.10:9090".to_string()), true),
            "192.168.1.10:9090",
            "Should use explicit override regardless of environment"
        );
        assert_eq!(resolve_bind_address(Some("  ".to_string()), false), "127.0.0.1:8080");
    }

    #[test]
    fn test_container_environment_detection() {
        assert!(!is_container_environment(None, None, false));
        assert!(is_container_environment(Some("kubernetes.default.svc"), None, false));
        assert!(is_container_environment(None, Some("true"), false));
        assert!(is_container_environment(None, None, true));
    }
}
