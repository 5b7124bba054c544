//! Cart route handlers.
//!
//! Cart operations use HTMX for in-place updates. Without HTMX each post
//! redirects back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use celestial_gems_core::{CartEntry, Notification, Price, Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::state::AppState;

use super::htmx::{Event, Htmx, trigger};
use super::views::Chrome;

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub subtotal: Price,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn of(shopper: &Shopper) -> Self {
        Self {
            items: shopper.cart().to_vec(),
            subtotal: shopper.cart_subtotal(),
            item_count: shopper.cart_item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/cart.html")]
pub struct CartShowTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

pub(super) fn find_product<'a>(state: &'a AppState, id: &ProductId) -> Result<&'a Product> {
    state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::BadRequest(format!("unknown product {id}")))
}

/// Display cart page.
#[instrument(skip(shopper, nonce))]
pub async fn show(shopper: Shopper, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    CartShowTemplate {
        cart: CartView::of(&shopper),
        chrome: Chrome::new(&shopper, nonce),
    }
}

/// Add a product to the cart.
///
/// A product already in the cart is left untouched; the toast says so and no
/// `cart-updated` event fires.
#[instrument(skip(state, shopper))]
pub async fn add(
    State(state): State<AppState>,
    Htmx(htmx): Htmx,
    mut shopper: Shopper,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;
    let notification = shopper.add_to_cart(product);
    shopper.save().await?;

    add_breadcrumb("cart", "add", &[("product_id", product.id.as_str())]);

    if !htmx {
        return Ok(Redirect::to("/cart").into_response());
    }

    let events: &[Event] = match notification {
        Notification::AddedToCart { .. } => &[Event::CartUpdated],
        _ => &[],
    };
    Ok((
        AppendHeaders([("HX-Trigger", trigger(events, Some(&notification)))]),
        CartCountTemplate {
            count: shopper.cart_item_count(),
        },
    )
        .into_response())
}

/// Update a line quantity. Values outside 1..=10 are ignored.
#[instrument(skip(shopper))]
pub async fn update(
    Htmx(htmx): Htmx,
    mut shopper: Shopper,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let changed = shopper.update_cart_quantity(&form.product_id, form.quantity);
    shopper.save().await?;
    Ok(items_response(htmx, changed, &shopper))
}

/// Remove a line from the cart.
#[instrument(skip(shopper))]
pub async fn remove(
    Htmx(htmx): Htmx,
    mut shopper: Shopper,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let changed = shopper.remove_from_cart(&form.product_id);
    shopper.save().await?;
    if changed {
        add_breadcrumb("cart", "remove", &[("product_id", form.product_id.as_str())]);
    }
    Ok(items_response(htmx, changed, &shopper))
}

/// The refreshed line items. `cart-updated` only fires when the cart changed.
fn items_response(htmx: bool, changed: bool, shopper: &Shopper) -> Response {
    if !htmx {
        return Redirect::to("/cart").into_response();
    }
    (
        changed.then(|| AppendHeaders([("HX-Trigger", trigger(&[Event::CartUpdated], None))])),
        CartItemsTemplate {
            cart: CartView::of(shopper),
        },
    )
        .into_response()
}

/// Cart count badge (HTMX).
#[instrument(skip(shopper))]
pub async fn count(shopper: Shopper) -> impl IntoResponse {
    CartCountTemplate {
        count: shopper.cart_item_count(),
    }
}
