//! Search route handlers.
//!
//! `/search` is the full results page and records the query in the
//! visitor's recent searches. `/search/suggest` feeds the header typeahead:
//! each keystroke is debounced per visitor, and a request overtaken by a
//! newer one answers `204 No Content`, which HTMX leaves unswapped.
//! Typeahead only reads the session, so it skips the visitor lock; holding
//! it would queue keystrokes behind each other instead of superseding them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use celestial_gems_core::{Product, ShopStore, rank, suggest};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::models::{SessionSlots, session_keys};
use crate::state::AppState;

use super::htmx::Htmx;
use super::views::{Chrome, ProductCard};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Full search results page.
#[derive(Template, WebTemplate)]
#[template(path = "pages/search.html")]
pub struct SearchPageTemplate {
    pub chrome: Chrome,
    pub query: String,
    pub results: Vec<ProductCard>,
    pub recent: Vec<String>,
}

/// Typeahead suggestions fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/suggestions.html")]
pub struct SuggestionsTemplate {
    pub query: String,
    pub products: Vec<Product>,
}

/// Recent searches fragment, shown when the search box is empty.
#[derive(Template, WebTemplate)]
#[template(path = "partials/recent_searches.html")]
pub struct RecentSearchesTemplate {
    pub recent: Vec<String>,
}

/// Display full search results and remember the query.
#[instrument(skip(state, shopper, nonce))]
pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    mut shopper: Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let q = query.q.trim().to_string();
    shopper.record_search(&q);
    shopper.save().await?;

    let ranked = rank(state.catalog(), &q);
    tracing::debug!(query = %q, results = ranked.len(), "Search");

    Ok(SearchPageTemplate {
        results: ProductCard::many(ranked.iter().map(|s| s.product), &shopper),
        recent: shopper.recent_searches().to_vec(),
        chrome: Chrome::new(&shopper, nonce),
        query: q,
    })
}

/// Typeahead suggestions (HTMX).
#[instrument(skip(state, session))]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    session: Session,
) -> Result<Response> {
    let visitor = session.get::<String>(session_keys::VISITOR_ID).await?;
    let q = query.q.trim();

    if q.is_empty() {
        if let Some(visitor) = &visitor {
            state.debouncer().cancel(visitor).await;
        }
        let store = ShopStore::open(SessionSlots::load(&session).await);
        return Ok(RecentSearchesTemplate {
            recent: store.recent_searches().to_vec(),
        }
        .into_response());
    }

    // Without a visitor id there is nothing to debounce against.
    if let Some(visitor) = &visitor
        && !state.debouncer().settle(visitor).await
    {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(SuggestionsTemplate {
        products: suggest(state.catalog(), q).into_iter().cloned().collect(),
        query: q.to_string(),
    }
    .into_response())
}

/// Forget recent searches.
#[instrument(skip(shopper))]
pub async fn clear_recent(Htmx(htmx): Htmx, mut shopper: Shopper) -> Result<Response> {
    shopper.clear_recent_searches();
    shopper.save().await?;

    if !htmx {
        return Ok(Redirect::to("/search").into_response());
    }
    Ok(RecentSearchesTemplate { recent: Vec::new() }.into_response())
}
