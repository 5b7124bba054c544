//! CelestialGems storefront library.
//!
//! The storefront is built as a library so the binary, the CLI and the
//! integration tests all assemble the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod claude;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;

use axum::{Router, http::Request};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::SessionStore;

use config::ConfigError;
use state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full application router over the given session store.
///
/// # Errors
///
/// Returns `ConfigError` if the rate limit settings are unusable.
pub fn app<Store>(state: AppState, store: Store) -> Result<Router, ConfigError>
where
    Store: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(store, state.config());
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Ok(routes::routes(&state.config().rate_limit)?
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn_with_state(
            middleware::VisitorLocks::new(),
            middleware::visitor_lock_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::csp_nonce_middleware))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(trace_layer)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction()))
}
