//! Liveness endpoint.

/// Handler for GET /health
///
/// Plain "OK" while the process is serving requests. No store round-trip.
pub async fn health_check() -> &'static str {
    "OK"
}
