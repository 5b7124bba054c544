//! SEO optimizer tool.
//!
//! Pick a catalog product, send its name and long description to Claude and
//! show suggested keywords plus a rewritten description. Failures are
//! retargeted into the inline error region so an earlier result stays on
//! screen.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use celestial_gems_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::services::SeoSuggestion;
use crate::state::AppState;

use super::htmx::Htmx;
use super::views::Chrome;

/// Message shown for any failed suggestion request.
pub const SEO_FAILED: &str = "Failed to generate SEO suggestions. Please try again.";
const SEO_DISABLED: &str = "The SEO optimizer is not configured on this server.";

/// Product picker query and form data.
#[derive(Debug, Default, Deserialize)]
pub struct SeoForm {
    #[serde(default)]
    pub product: String,
}

/// A product option in the picker.
#[derive(Clone)]
pub struct ProductOption {
    pub slug: String,
    pub name: String,
    pub selected: bool,
}

/// SEO tool page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/seo.html")]
pub struct SeoPageTemplate {
    pub chrome: Chrome,
    pub enabled: bool,
    pub options: Vec<ProductOption>,
    pub selected: Option<Product>,
    pub suggestion: Option<SeoSuggestion>,
    pub error: Option<String>,
}

/// Read-only description of the selected product (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/seo_description.html")]
pub struct SeoDescriptionTemplate {
    pub selected: Option<Product>,
}

/// Suggestion result fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/seo_result.html")]
pub struct SeoResultTemplate {
    pub suggestion: SeoSuggestion,
}

/// Inline error fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/seo_error.html")]
pub struct SeoErrorTemplate {
    pub message: String,
}

fn options(state: &AppState, selected: Option<&Product>) -> Vec<ProductOption> {
    state
        .catalog()
        .products()
        .iter()
        .map(|p| ProductOption {
            slug: p.slug.clone(),
            name: p.name.clone(),
            selected: selected.is_some_and(|s| s.id == p.id),
        })
        .collect()
}

/// Display the tool, or just the description panel for an HTMX picker change.
#[instrument(skip(state, shopper, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<SeoForm>,
    Htmx(htmx): Htmx,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> Response {
    let selected = state.catalog().find_by_slug(&query.product);

    if htmx {
        return SeoDescriptionTemplate {
            selected: selected.cloned(),
        }
        .into_response();
    }

    SeoPageTemplate {
        enabled: state.seo().is_some(),
        options: options(&state, selected),
        selected: selected.cloned(),
        suggestion: None,
        error: None,
        chrome: Chrome::new(&shopper, nonce),
    }
    .into_response()
}

/// Generate suggestions for the chosen product.
#[instrument(skip(state, shopper, nonce))]
pub async fn generate(
    State(state): State<AppState>,
    Htmx(htmx): Htmx,
    shopper: Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<SeoForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .find_by_slug(&form.product)
        .ok_or_else(|| AppError::BadRequest("Please select a product.".to_string()))?;

    let outcome = match state.seo() {
        Some(seo) => seo
            .suggest(&product.name, &product.long_description)
            .await
            .map_err(|err| {
                tracing::warn!(product = %product.slug, error = %err, "SEO suggestion failed");
                SEO_FAILED.to_string()
            }),
        None => Err(SEO_DISABLED.to_string()),
    };

    if htmx {
        return Ok(match outcome {
            Ok(suggestion) => SeoResultTemplate { suggestion }.into_response(),
            Err(message) => (
                AppendHeaders([("HX-Retarget", "#seo-error"), ("HX-Reswap", "innerHTML")]),
                SeoErrorTemplate { message },
            )
                .into_response(),
        });
    }

    let (suggestion, error) = match outcome {
        Ok(suggestion) => (Some(suggestion), None),
        Err(message) => (None, Some(message)),
    };
    Ok(SeoPageTemplate {
        enabled: state.seo().is_some(),
        options: options(&state, Some(product)),
        selected: Some(product.clone()),
        suggestion,
        error,
        chrome: Chrome::new(&shopper, nonce),
    }
    .into_response())
}
