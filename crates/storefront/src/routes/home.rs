//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use celestial_gems_core::CategoryInfo;
use tracing::instrument;

use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::state::AppState;

use super::views::{Chrome, ProductCard};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub categories: Vec<CategoryInfo>,
    pub trending: Vec<ProductCard>,
    pub products: Vec<ProductCard>,
}

/// Display the home page: hero, categories, trending and the full collection.
#[instrument(skip(state, shopper, nonce))]
pub async fn home(
    State(state): State<AppState>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let catalog = state.catalog();
    HomeTemplate {
        categories: catalog.categories(),
        trending: ProductCard::many(catalog.trending(), &shopper),
        products: ProductCard::many(catalog.products(), &shopper),
        chrome: Chrome::new(&shopper, nonce),
    }
}
