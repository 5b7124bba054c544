//! CelestialGems storefront - public watch shop.
//!
//! This binary serves the storefront on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - Catalog loaded once from `content/catalog.json`
//! - Cart, wishlist and recent searches stored per visitor in the session
//! - `PostgreSQL` session store when configured, in-memory otherwise
//! - SMTP order emails and optional Claude-backed SEO suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use celestial_gems_storefront::{
    app,
    config::StorefrontConfig,
    content, db,
    services::EmailService,
    state::AppState,
};
use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "celestial_gems_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let catalog = content::load_catalog(&config.catalog_path).expect("Failed to load catalog");
    tracing::info!(products = catalog.len(), "Catalog loaded");

    let email = EmailService::new(&config.email).expect("Failed to configure email");
    if config.claude.is_none() {
        tracing::warn!("CLAUDE_API_KEY not set; SEO optimizer disabled");
    }

    let addr = config.socket_addr();

    // Sessions live in Postgres when a database is configured.
    // NOTE: the session table is NOT migrated on startup.
    // Run it explicitly via: cargo run -p celestial-gems-cli -- migrate
    let router = match config.database_url.clone() {
        Some(url) => {
            let pool = db::create_pool(&url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            let store = PostgresStore::new(pool.clone());
            let state = AppState::new(config, catalog, email, Some(pool))
                .expect("Failed to initialize application state");
            app(state, store)
        }
        None => {
            tracing::warn!("No database configured; sessions are kept in memory");
            let state = AppState::new(config, catalog, email, None)
                .expect("Failed to initialize application state");
            app(state, MemoryStore::default())
        }
    }
    .expect("Failed to build router");

    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
