//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::state::AppState;

use super::views::{Chrome, ProductCard};

/// How many same-brand or same-category products to suggest.
const RELATED_LIMIT: usize = 4;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/products.html")]
pub struct ProductsIndexTemplate {
    pub chrome: Chrome,
    pub products: Vec<ProductCard>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/product.html")]
pub struct ProductShowTemplate {
    pub chrome: Chrome,
    pub card: ProductCard,
    pub related: Vec<ProductCard>,
}

/// Display all products.
#[instrument(skip(state, shopper, nonce))]
pub async fn index(
    State(state): State<AppState>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    ProductsIndexTemplate {
        products: ProductCard::many(state.catalog().products(), &shopper),
        chrome: Chrome::new(&shopper, nonce),
    }
}

/// Display a product detail page.
#[instrument(skip(state, shopper, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let product = catalog
        .find_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let related = catalog
        .products()
        .iter()
        .filter(|p| p.id != product.id)
        .filter(|p| p.brand == product.brand || p.category == product.category)
        .take(RELATED_LIMIT);

    Ok(ProductShowTemplate {
        card: ProductCard::new(product, &shopper),
        related: ProductCard::many(related, &shopper),
        chrome: Chrome::new(&shopper, nonce),
    })
}
