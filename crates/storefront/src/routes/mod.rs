//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /products/{slug}        - Product detail
//! GET  /categories             - Category overview
//! GET  /categories/{category}  - Category listing
//! GET  /brands                 - Brand listing
//! GET  /brands/{slug}          - Brand lineup
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (cart_items fragment)
//! POST /cart/remove            - Remove item (cart_items fragment)
//! GET  /cart/count             - Cart count badge
//!
//! # Wishlist (HTMX fragments)
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/toggle        - Toggle (button fragment, triggers wishlist-updated)
//! POST /wishlist/remove        - Remove (wishlist_items fragment)
//! GET  /wishlist/count         - Wishlist count badge
//!
//! # Search
//! GET  /search                 - Results page
//! GET  /search/suggest         - Typeahead fragment (debounced)
//! POST /search/recent/clear    - Clear recent searches
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place order (rate limited)
//! GET  /checkout/complete      - Order confirmation
//!
//! # Other
//! GET  /contact                - Contact page
//! GET  /admin/seo-optimizer    - SEO tool
//! POST /admin/seo-optimizer    - Generate suggestions (rate limited)
//! ```

pub mod brands;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod home;
pub mod htmx;
pub mod products;
pub mod search;
pub mod seo;
pub mod views;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::{ConfigError, RateLimitConfig};
use crate::middleware::order_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{category}", get(categories::show))
}

/// Create the brand routes router.
pub fn brand_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(brands::index))
        .route("/{slug}", get(brands::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
        .route("/count", get(wishlist::count))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search::page))
        .route("/suggest", get(search::suggestions))
        .route("/recent/clear", post(search::clear_recent))
}

/// Create the checkout routes router. Placing an order is rate limited.
///
/// # Errors
///
/// Returns `ConfigError` if the rate limit settings are unusable.
pub fn checkout_routes(rate_limit: &RateLimitConfig) -> Result<Router<AppState>, ConfigError> {
    Ok(Router::new()
        .route(
            "/",
            get(checkout::show).merge(
                post(checkout::place_order).layer(order_rate_limiter(rate_limit)?),
            ),
        )
        .route("/complete", get(checkout::complete)))
}

/// Create the admin tool routes router. Generating suggestions is rate limited.
///
/// # Errors
///
/// Returns `ConfigError` if the rate limit settings are unusable.
pub fn admin_routes(rate_limit: &RateLimitConfig) -> Result<Router<AppState>, ConfigError> {
    Ok(Router::new().route(
        "/seo-optimizer",
        get(seo::show).merge(post(seo::generate).layer(order_rate_limiter(rate_limit)?)),
    ))
}

/// Create all routes for the storefront.
///
/// # Errors
///
/// Returns `ConfigError` if the rate limit settings are unusable.
pub fn routes(rate_limit: &RateLimitConfig) -> Result<Router<AppState>, ConfigError> {
    Ok(Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/brands", brand_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/search", search_routes())
        .nest("/checkout", checkout_routes(rate_limit)?)
        .nest("/admin", admin_routes(rate_limit)?)
        .route("/contact", get(contact::show)))
}
