//! Integration tests for the session-backed cart and wishlist.

use celestial_gems_integration_tests::{TestApp, hx_trigger};
use reqwest::StatusCode;
use tokio::task::JoinSet;

const SUBMARINER: &str = "1";
const SNOWFLAKE: &str = "6";

#[tokio::test]
async fn test_plain_form_add_redirects_to_cart() {
    let app = TestApp::spawn().await;
    let resp = app.post("/cart/add", &[("product_id", SUBMARINER)]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cart");

    let cart = app.page("/cart").await;
    assert!(cart.contains("Rolex Submariner"));
    assert!(cart.contains("$10250.00"));
}

#[tokio::test]
async fn test_htmx_add_returns_badge_and_toast() {
    let app = TestApp::spawn().await;

    let resp = app.htmx_post("/cart/add", &[("product_id", SUBMARINER)]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let trigger = hx_trigger(&resp).unwrap_or_default();
    assert_eq!(trigger["cart-updated"], true);
    assert_eq!(trigger["toast"]["title"], "Added to Cart");
    assert_eq!(trigger["toast"]["variant"], "default");
    assert!(resp.text().await.unwrap_or_default().contains(">1<"));

    // A second add leaves the line alone.
    let resp = app.htmx_post("/cart/add", &[("product_id", SUBMARINER)]).await;
    let trigger = hx_trigger(&resp).unwrap_or_default();
    assert!(trigger.get("cart-updated").is_none());
    assert_eq!(trigger["toast"]["title"], "Already in Cart");

    let count = app.page("/cart/count").await;
    assert!(count.contains(">1<"));
}

#[tokio::test]
async fn test_update_quantity_and_remove() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", SNOWFLAKE)]).await;

    let resp = app
        .htmx_post("/cart/update", &[("product_id", SNOWFLAKE), ("quantity", "3")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&resp).unwrap_or_default()["cart-updated"], true);
    let body = resp.text().await.unwrap_or_default();
    assert!(body.contains("$17400.00"));
    assert!(body.contains("3 items"));

    // Out of range quantities are ignored.
    let body = app
        .htmx_post("/cart/update", &[("product_id", SNOWFLAKE), ("quantity", "11")])
        .await
        .text()
        .await
        .unwrap_or_default();
    assert!(body.contains("3 items"));

    let resp = app.htmx_post("/cart/remove", &[("product_id", SNOWFLAKE)]).await;
    assert_eq!(hx_trigger(&resp).unwrap_or_default()["cart-updated"], true);
    assert!(resp.text().await.unwrap_or_default().contains("Your cart is empty."));
}

#[tokio::test]
async fn test_noop_cart_changes_fire_no_event() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", SNOWFLAKE)]).await;

    for quantity in ["11", "0", "1"] {
        let resp = app
            .htmx_post("/cart/update", &[("product_id", SNOWFLAKE), ("quantity", quantity)])
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(hx_trigger(&resp).is_none(), "quantity {quantity}");
        assert!(resp.text().await.unwrap_or_default().contains("1 item"));
    }

    let resp = app
        .htmx_post("/cart/update", &[("product_id", SUBMARINER), ("quantity", "2")])
        .await;
    assert!(hx_trigger(&resp).is_none());

    let resp = app.htmx_post("/cart/remove", &[("product_id", SUBMARINER)]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(hx_trigger(&resp).is_none());
    assert!(resp.text().await.unwrap_or_default().contains("Grand Seiko Snowflake"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_all_kept() {
    let app = TestApp::spawn().await;
    app.page("/cart").await;

    let ids: Vec<String> = (1..=11).map(|n| n.to_string()).collect();
    let mut adds = JoinSet::new();
    for id in ids.clone() {
        let request = app
            .client
            .post(app.url("/cart/add"))
            .header("HX-Request", "true")
            .form(&[("product_id", id)]);
        adds.spawn(async move { request.send().await });
    }
    while let Some(result) = adds.join_next().await {
        let resp = result.expect("add task panicked").expect("add failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert!(app.page("/cart/count").await.contains(">11<"));
    let cart = app.page("/cart").await;
    assert!(cart.contains("Rolex Submariner"));
    assert!(cart.contains("Grand Seiko Snowflake"));
    assert!(cart.contains("11 items"));
}

#[tokio::test]
async fn test_unknown_product_is_bad_request() {
    let app = TestApp::spawn().await;
    let resp = app.htmx_post("/cart/add", &[("product_id", "999")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", SUBMARINER)]).await;

    let other = app.new_visitor();
    let cart = other.page("/cart").await;
    assert!(cart.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_wishlist_toggle() {
    let app = TestApp::spawn().await;

    let resp = app.htmx_post("/wishlist/toggle", &[("product_id", SNOWFLAKE)]).await;
    let trigger = hx_trigger(&resp).unwrap_or_default();
    assert_eq!(trigger["wishlist-updated"], true);
    assert_eq!(trigger["toast"]["title"], "Added to Wishlist");
    assert!(resp.text().await.unwrap_or_default().contains(r#"aria-pressed="true""#));
    assert!(app.page("/wishlist").await.contains("Grand Seiko Snowflake"));

    let resp = app.htmx_post("/wishlist/toggle", &[("product_id", SNOWFLAKE)]).await;
    let trigger = hx_trigger(&resp).unwrap_or_default();
    assert_eq!(trigger["toast"]["title"], "Removed from Wishlist");
    assert_eq!(trigger["toast"]["variant"], "destructive");
    assert!(resp.text().await.unwrap_or_default().contains(r#"aria-pressed="false""#));
}

#[tokio::test]
async fn test_wishlist_remove_returns_remaining_items() {
    let app = TestApp::spawn().await;
    app.htmx_post("/wishlist/toggle", &[("product_id", SNOWFLAKE)]).await;
    app.htmx_post("/wishlist/toggle", &[("product_id", SUBMARINER)]).await;
    assert!(app.page("/wishlist/count").await.contains(">2<"));

    let body = app
        .htmx_post("/wishlist/remove", &[("product_id", SNOWFLAKE)])
        .await
        .text()
        .await
        .unwrap_or_default();
    assert!(body.contains("Rolex Submariner"));
    assert!(!body.contains("Grand Seiko Snowflake"));
}

#[tokio::test]
async fn test_cart_state_marks_product_cards() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", SUBMARINER)]).await;

    let body = app.page("/products/rolex-submariner").await;
    assert!(body.contains("In Cart"));
}
