//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode};

use crate::db;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Requires a loaded catalog and, when a session database is configured, a
/// successful ping. Returns 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_empty() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    if let Some(pool) = state.pool()
        && let Err(err) = db::ping(pool).await
    {
        tracing::warn!(error = %err, "Session database unreachable");
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    StatusCode::OK
}
