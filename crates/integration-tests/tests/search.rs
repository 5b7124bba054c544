//! Integration tests for search, typeahead and recent searches.

use std::time::Duration;

use celestial_gems_integration_tests::{TestApp, TestOptions};
use reqwest::StatusCode;

#[tokio::test]
async fn test_results_page_ranks_and_records_query() {
    let app = TestApp::spawn().await;
    let body = app.page("/search?q=seiko").await;

    assert!(body.contains("Grand Seiko Snowflake"));
    assert!(body.contains("Seiko Prospex Turtle"));
    assert!(!body.contains("Rolex Submariner"));
    assert!(body.contains("Recent searches"));

    // An empty query box shows recent searches.
    let recent = app.htmx_get("/search/suggest?q=").await.text().await.unwrap_or_default();
    assert!(recent.contains(r#"href="/search?q=seiko""#));
}

#[tokio::test]
async fn test_no_results_message() {
    let app = TestApp::spawn().await;
    let body = app.page("/search?q=pocket").await;
    assert!(body.contains("0 results"));
    assert!(body.contains("No watches match your search."));
}

#[tokio::test]
async fn test_suggestions_fragment() {
    let app = TestApp::spawn().await;
    let resp = app.htmx_get("/search/suggest?q=omega").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap_or_default();
    assert!(body.contains("/products/omega-seamaster-diver-300m"));
    assert!(body.contains("/products/omega-speedmaster-moonwatch"));
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn test_suggestions_are_capped() {
    let app = TestApp::spawn().await;
    // "s" matches most of the catalog (Swiss, Seiko, ...).
    let body = app.htmx_get("/search/suggest?q=s").await.text().await.unwrap_or_default();
    let shown = body.matches(r#"role="option""#).count();
    assert!(shown > 0 && shown <= 8, "got {shown} suggestions");
}

#[tokio::test]
async fn test_superseded_typeahead_gets_no_content() {
    let app = TestApp::spawn_with(TestOptions {
        debounce_ms: 300,
        ..TestOptions::default()
    })
    .await;
    // Establish the session so both requests share a visitor.
    app.page("/").await;

    let first = app.htmx_get("/search/suggest?q=ro");
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.htmx_get("/search/suggest?q=rol").await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert_eq!(second.status(), StatusCode::OK);
    assert!(second.text().await.unwrap_or_default().contains("Rolex Submariner"));
}

#[tokio::test]
async fn test_clear_recent_searches() {
    let app = TestApp::spawn().await;
    app.page("/search?q=tudor").await;

    let resp = app.htmx_post("/search/recent/clear", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap_or_default().trim().is_empty());

    let body = app.page("/search").await;
    assert!(!body.contains("Recent searches"));
}
