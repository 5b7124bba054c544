//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use celestial_gems_core::{Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::state::AppState;

use super::cart::find_product;
use super::htmx::{Event, Htmx, trigger};
use super::views::{Chrome, ProductCard};

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: ProductId,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/wishlist.html")]
pub struct WishlistShowTemplate {
    pub chrome: Chrome,
    pub items: Vec<ProductCard>,
}

/// Wishlist items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishlistItemsTemplate {
    pub items: Vec<ProductCard>,
}

/// Heart button fragment, swapped in place after a toggle.
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_button.html")]
pub struct WishlistButtonTemplate {
    pub card: ProductCard,
}

/// Wishlist count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_count.html")]
pub struct WishlistCountTemplate {
    pub count: usize,
}

fn items(shopper: &Shopper) -> Vec<ProductCard> {
    ProductCard::many(shopper.wishlist().iter(), shopper)
}

#[instrument(skip(shopper, nonce))]
pub async fn show(shopper: Shopper, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    WishlistShowTemplate {
        items: items(&shopper),
        chrome: Chrome::new(&shopper, nonce),
    }
}

/// Toggle wishlist membership; responds with the updated heart button.
#[instrument(skip(state, shopper))]
pub async fn toggle(
    State(state): State<AppState>,
    Htmx(htmx): Htmx,
    mut shopper: Shopper,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let product: &Product = find_product(&state, &form.product_id)?;
    let notification = shopper.add_to_wishlist(product);
    shopper.save().await?;

    add_breadcrumb("wishlist", "toggle", &[("product_id", product.id.as_str())]);

    if !htmx {
        return Ok(Redirect::to("/wishlist").into_response());
    }
    Ok((
        AppendHeaders([(
            "HX-Trigger",
            trigger(&[Event::WishlistUpdated], Some(&notification)),
        )]),
        WishlistButtonTemplate {
            card: ProductCard::new(product, &shopper),
        },
    )
        .into_response())
}

/// Remove from the wishlist page; responds with the remaining items.
#[instrument(skip(shopper))]
pub async fn remove(
    Htmx(htmx): Htmx,
    mut shopper: Shopper,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let notification = shopper.remove_from_wishlist(&form.product_id);
    shopper.save().await?;

    if !htmx {
        return Ok(Redirect::to("/wishlist").into_response());
    }
    Ok((
        AppendHeaders([(
            "HX-Trigger",
            trigger(&[Event::WishlistUpdated], Some(&notification)),
        )]),
        WishlistItemsTemplate {
            items: items(&shopper),
        },
    )
        .into_response())
}

/// Wishlist count badge (HTMX).
#[instrument(skip(shopper))]
pub async fn count(shopper: Shopper) -> impl IntoResponse {
    WishlistCountTemplate {
        count: shopper.wishlist().len(),
    }
}
