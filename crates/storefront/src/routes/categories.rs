//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use celestial_gems_core::{Category, CategoryInfo};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::state::AppState;

use super::views::{Chrome, ProductCard};

/// Category overview template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/categories.html")]
pub struct CategoriesIndexTemplate {
    pub chrome: Chrome,
    pub categories: Vec<CategoryInfo>,
}

/// Products in one category.
#[derive(Template, WebTemplate)]
#[template(path = "pages/category.html")]
pub struct CategoryShowTemplate {
    pub chrome: Chrome,
    pub category: Category,
    pub products: Vec<ProductCard>,
}

#[instrument(skip(state, shopper, nonce))]
pub async fn index(
    State(state): State<AppState>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    CategoriesIndexTemplate {
        categories: state.catalog().categories(),
        chrome: Chrome::new(&shopper, nonce),
    }
}

/// Products in a category; the path segment is case-insensitive.
#[instrument(skip(state, shopper, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let category = Category::parse(&segment)
        .ok_or_else(|| AppError::NotFound(format!("category {segment}")))?;

    Ok(CategoryShowTemplate {
        category,
        products: ProductCard::many(state.catalog().by_category(category), &shopper),
        chrome: Chrome::new(&shopper, nonce),
    })
}
