//! Integration tests for CelestialGems.
//!
//! Each test spawns the full storefront router on an ephemeral port with an
//! in-memory session store and a stub mail transport, then drives it over
//! HTTP with a cookie-keeping `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p celestial-gems-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{Json, Router, http::StatusCode, routing::post};
use celestial_gems_storefront::{
    app, config::StorefrontConfig, content, services::EmailService, state::AppState,
};
use lettre::transport::stub::AsyncStubTransport;
use reqwest::{Client, Response, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

/// Claude API key that passes secret validation.
pub const TEST_CLAUDE_KEY: &str = "sk-ant-REDACTED";

/// Knobs for a spawned storefront.
pub struct TestOptions {
    pub debounce_ms: u64,
    pub rate_limit_burst: u32,
    pub claude_url: Option<String>,
    pub mail: AsyncStubTransport,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            debounce_ms: 0,
            rate_limit_burst: 50,
            claude_url: None,
            mail: AsyncStubTransport::new_ok(),
        }
    }
}

/// A running storefront plus a client with its own cookie jar.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub mail: AsyncStubTransport,
}

fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/content/catalog.json")
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

impl TestApp {
    /// Spawn with defaults: no debounce, generous rate limit, working mail.
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let mut vars: HashMap<&str, String> = HashMap::from([
            ("STOREFRONT_BASE_URL", "http://127.0.0.1".to_string()),
            ("EMAIL_SERVER_USER", "orders@celestialgems.shop".to_string()),
            ("EMAIL_SERVER_PASSWORD", "app-password".to_string()),
            ("EMAIL_ADMIN", "owner@celestialgems.shop".to_string()),
            ("CATALOG_PATH", catalog_path().display().to_string()),
            ("SEARCH_DEBOUNCE_MS", options.debounce_ms.to_string()),
            ("RATE_LIMIT_REPLENISH_MS", "60000".to_string()),
            ("RATE_LIMIT_BURST", options.rate_limit_burst.to_string()),
        ]);
        if let Some(url) = options.claude_url {
            vars.insert("CLAUDE_API_KEY", TEST_CLAUDE_KEY.to_string());
            vars.insert("CLAUDE_API_URL", url);
        }

        let config = StorefrontConfig::from_lookup(&|key| vars.get(key).cloned())
            .expect("Failed to build test configuration");
        let catalog = content::load_catalog(&config.catalog_path).expect("Failed to load catalog");
        let email = EmailService::with_stub(&config.email, options.mail.clone())
            .expect("Failed to build email service");
        let state = AppState::new(config, catalog, email, None).expect("Failed to build state");
        let router = app(state, MemoryStore::default()).expect("Failed to build router");

        let base_url = serve(router).await;
        Self {
            base_url,
            client: client(),
            mail: options.mail,
        }
    }

    /// A second visitor on the same server, with an empty cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: client(),
            mail: self.mail.clone(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn htmx_get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("HTMX GET failed")
    }

    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("HTMX POST failed")
    }

    /// Body of a GET, asserting 200.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });
    format!("http://{addr}")
}

/// Parsed `HX-Trigger` header, if present.
#[must_use]
pub fn hx_trigger(resp: &Response) -> Option<Value> {
    resp.headers()
        .get("hx-trigger")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| serde_json::from_str(v).ok())
}

/// Valid card checkout fields.
#[must_use]
pub fn card_checkout_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane Doe"),
        ("email", "jane@example.com"),
        ("address", "123 Luxury Lane"),
        ("city", "Jewel City"),
        ("state", "CA"),
        ("zip", "90210"),
        ("payment_method", "card"),
        ("card_number", "4242 4242 4242 4242"),
        ("expiry_date", "12/30"),
        ("cvc", "123"),
    ]
}

/// Stand-in for the Claude Messages API answering every call with `text`,
/// or with `status` and an error body when `status` is not 200.
pub async fn spawn_fake_claude(status: StatusCode, text: &'static str) -> String {
    let router = Router::new().route(
        "/v1/messages",
        post(move || async move {
            if status != StatusCode::OK {
                return (
                    status,
                    Json(json!({
                        "type": "error",
                        "error": {"type": "api_error", "message": "upstream failure"}
                    })),
                );
            }
            (
                StatusCode::OK,
                Json(json!({
                    "id": "msg_test",
                    "type": "message",
                    "role": "assistant",
                    "model": "claude-sonnet-4-20250514",
                    "stop_reason": "end_turn",
                    "content": [{"type": "text", "text": text}],
                    "usage": {"input_tokens": 120, "output_tokens": 80}
                })),
            )
        }),
    );
    format!("{}/v1/messages", serve(router).await)
}
