//! Metrics definitions for the identity service
//!
//! All metrics follow Prometheus naming conventions:
//! - `identity_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: 2 values (success, error)
//! - `outcome`: bounded by [`crate::errors::ErrorKind`] codes plus `ok`
//! - `step`: bounded by the validation step list
//! - `path`: known routes, everything else is `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("identity_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Bcrypt dominates authentication latency; cost 12 is ~250ms.
        .set_buckets_for_metric(
            Matcher::Prefix("identity_authentication".to_string()),
            &[0.050, 0.100, 0.250, 0.500, 1.000, 2.000, 5.000],
        )
        .map_err(|e| format!("Failed to set authentication buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("identity_token_issuance".to_string()),
            &[0.0005, 0.001, 0.002, 0.005, 0.010, 0.050],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record a session token issuance
///
/// Metric: `identity_token_issuance_total`, `identity_token_issuance_duration_seconds`
/// Labels: `status`
pub fn record_token_issuance(status: &str, duration: Duration) {
    histogram!("identity_token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("identity_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record a session token verification
///
/// Metric: `identity_token_validations_total`
/// Labels: `status`, `outcome`
pub fn record_token_validation(status: &str, outcome: &str) {
    counter!("identity_token_validations_total", "status" => status.to_string(), "outcome" => outcome.to_string())
        .increment(1);
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record a password authentication attempt
///
/// Metric: `identity_authentications_total`, `identity_authentication_duration_seconds`
/// Labels: `status`, `outcome`
pub fn record_authentication(status: &str, outcome: &str, duration: Duration) {
    histogram!("identity_authentication_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("identity_authentications_total", "status" => status.to_string(), "outcome" => outcome.to_string())
        .increment(1);
}

/// Record a validation step that rejected an account
///
/// Metric: `identity_validation_failures_total`
/// Labels: `step`
pub fn record_validation_failure(step: &str) {
    counter!("identity_validation_failures_total", "step" => step.to_string()).increment(1);
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `identity_http_requests_total`, `identity_http_request_duration_seconds`
/// Labels: `method`, `path`, `status_code`
///
/// Captures framework-level rejections too (415, 400 on bad JSON, 404, 405).
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let normalized_path = normalize_path(path);

    histogram!("identity_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => normalized_path.to_string(),
        "status_code" => status_code.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("identity_http_requests_total",
        "method" => method.to_string(),
        "path" => normalized_path.to_string(),
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Map a request path onto a bounded label set.
fn normalize_path(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/api/v1/user" => "/api/v1/user",
        "/api/v1/user/register" => "/api/v1/user/register",
        "/api/v1/user/login" => "/api/v1/user/login",
        "/api/v1/user/check" => "/api/v1/user/check",
        _ => "/other",
    }
}
