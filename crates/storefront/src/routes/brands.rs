//! Brand route handlers.
//!
//! Brands are derived from the catalog. A brand page splits the lineup into
//! Professional and Classic sections when the brand's products carry a model
//! type, and lists everything else underneath.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use celestial_gems_core::Brand;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::state::AppState;

use super::views::{Chrome, ProductCard};

/// A brand with how many products it has.
#[derive(Clone)]
pub struct BrandSummary {
    pub brand: Brand,
    pub product_count: usize,
}

/// Brand list template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/brands.html")]
pub struct BrandsIndexTemplate {
    pub chrome: Chrome,
    pub brands: Vec<BrandSummary>,
}

/// Brand lineup template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/brand.html")]
pub struct BrandShowTemplate {
    pub chrome: Chrome,
    pub brand: Brand,
    pub has_model_types: bool,
    pub professional: Vec<ProductCard>,
    pub classic: Vec<ProductCard>,
    pub other: Vec<ProductCard>,
}

#[instrument(skip(state, shopper, nonce))]
pub async fn index(
    State(state): State<AppState>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let catalog = state.catalog();
    let brands = catalog
        .brands()
        .into_iter()
        .map(|brand| BrandSummary {
            product_count: catalog
                .products()
                .iter()
                .filter(|p| p.brand == brand.name)
                .count(),
            brand,
        })
        .collect();

    BrandsIndexTemplate {
        brands,
        chrome: Chrome::new(&shopper, nonce),
    }
}

#[instrument(skip(state, shopper, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let brand = catalog
        .find_brand(&slug)
        .ok_or_else(|| AppError::NotFound(format!("brand {slug}")))?;
    let lineup = catalog.brand_lineup(&brand);

    Ok(BrandShowTemplate {
        has_model_types: lineup.has_model_types(),
        professional: ProductCard::many(lineup.professional.iter().copied(), &shopper),
        classic: ProductCard::many(lineup.classic.iter().copied(), &shopper),
        other: ProductCard::many(lineup.other.iter().copied(), &shopper),
        brand,
        chrome: Chrome::new(&shopper, nonce),
    })
}
