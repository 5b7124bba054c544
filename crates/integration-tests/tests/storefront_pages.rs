//! Integration tests for the catalog pages and response headers.

use celestial_gems_integration_tests::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::spawn().await;
    assert_eq!(app.page("/health").await, "ok");
    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_home_shows_categories_and_trending() {
    let app = TestApp::spawn().await;
    let body = app.page("/").await;

    assert!(body.contains("Trending Now"));
    assert!(body.contains("Rolex Submariner"));
    assert!(body.contains(r#"href="/categories/japanese""#));
    assert!(body.contains(r#"href="/brands/grand-seiko""#));
}

#[tokio::test]
async fn test_product_detail_and_missing_product() {
    let app = TestApp::spawn().await;
    let body = app.page("/products/omega-seamaster-diver-300m").await;
    assert!(body.contains("$5200.00"));
    assert!(body.contains("You May Also Like"));

    let resp = app.get("/products/cartier-tank").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_segment_is_case_insensitive() {
    let app = TestApp::spawn().await;
    let body = app.page("/categories/JAPANESE").await;
    assert!(body.contains("Grand Seiko Snowflake"));
    assert!(!body.contains("Rolex Submariner"));

    assert_eq!(
        app.get("/categories/german").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_brand_lineup_sections() {
    let app = TestApp::spawn().await;

    let rolex = app.page("/brands/rolex").await;
    assert!(rolex.contains("<h2>Professional</h2>"));
    assert!(rolex.contains("<h2>Classic</h2>"));
    assert!(rolex.contains("Rolex Datejust 41"));

    let tudor = app.page("/brands/tudor").await;
    assert!(!tudor.contains("<h2>Professional</h2>"));
    assert!(tudor.contains("Tudor Black Bay 58"));

    assert_eq!(app.get("/brands/cartier").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_page() {
    let app = TestApp::spawn().await;
    let body = app.page("/contact").await;
    assert!(body.contains("support@celestialgems.com"));
    assert!(body.contains("(123) 456-7890"));
    assert!(body.contains("123 Elegance Avenue, Jewel City, 90210"));
}

#[tokio::test]
async fn test_security_headers_and_script_nonce() {
    let app = TestApp::spawn().await;
    let resp = app.get("/").await;

    let headers = resp.headers().clone();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("x-request-id"));

    let csp = headers["content-security-policy"].to_str().unwrap_or_default().to_string();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap_or_default()
        .to_string();
    assert!(!nonce.is_empty());

    let body = resp.text().await.unwrap_or_default();
    assert!(body.contains(&format!(r#"nonce="{nonce}""#)));
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let app = TestApp::spawn().await;
    let resp = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap_or_else(|e| panic!("request failed: {e}"));
    assert_eq!(resp.headers()["x-request-id"], "req-42");
}
