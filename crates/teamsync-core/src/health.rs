use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /` — plain-text liveness line kept for legacy probes.
pub async fn index() -> &'static str {
    "Server running successfully!"
}
