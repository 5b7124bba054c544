//! Display data shared by page templates.

use celestial_gems_core::Product;

use crate::middleware::Shopper;

/// Header and script context every full page needs.
#[derive(Clone)]
pub struct Chrome {
    pub nonce: String,
    pub cart_count: u32,
    pub wishlist_count: usize,
}

impl Chrome {
    #[must_use]
    pub fn new(shopper: &Shopper, nonce: String) -> Self {
        Self {
            nonce,
            cart_count: shopper.cart_item_count(),
            wishlist_count: shopper.wishlist().len(),
        }
    }
}

/// A product plus the visitor's state for it.
#[derive(Clone)]
pub struct ProductCard {
    pub product: Product,
    pub in_cart: bool,
    pub in_wishlist: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, shopper: &Shopper) -> Self {
        Self {
            product: product.clone(),
            in_cart: shopper.is_in_cart(&product.id),
            in_wishlist: shopper.is_in_wishlist(&product.id),
        }
    }

    /// Cards for a run of products.
    pub fn many<'a>(products: impl IntoIterator<Item = &'a Product>, shopper: &Shopper) -> Vec<Self> {
        products
            .into_iter()
            .map(|p| Self::new(p, shopper))
            .collect()
    }
}
