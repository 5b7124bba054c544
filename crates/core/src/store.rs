//! Cart and wishlist store.
//!
//! [`ShopStore`] is the single owner of the shopper's cart, wishlist and
//! recent searches. It is opened over a [`SlotStorage`], rehydrates every slot
//! up front, and writes the affected slot back after each mutation that
//! changes state.
//!
//! Storage is best-effort. A slot that cannot be read or parsed starts empty,
//! and a failed write is logged and dropped; neither is ever surfaced to the
//! caller.

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Product;
use crate::storage::{Slot, SlotStorage};
use crate::types::{Price, ProductId};

/// Maximum number of remembered searches.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// A cart line quantity, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u8);

impl Quantity {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 10;
    pub const ONE: Self = Self(1);

    /// Returns `None` when `n` is outside `1..=10`.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            u8::try_from(n).ok().map(Self)
        } else {
            None
        }
    }

    #[must_use]
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| format!("quantity {n} is outside 1..=10"))
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product in the cart with its quantity.
///
/// Serializes as the product's own fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: Quantity,
}

impl CartEntry {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// Toast styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// User-facing outcome of a store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    AddedToCart { name: String },
    AlreadyInCart { name: String },
    AddedToWishlist { name: String },
    RemovedFromWishlist,
}

impl Notification {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::AddedToCart { .. } => "Added to Cart",
            Self::AlreadyInCart { .. } => "Already in Cart",
            Self::AddedToWishlist { .. } => "Added to Wishlist",
            Self::RemovedFromWishlist => "Removed from Wishlist",
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::AddedToCart { name } => format!("{name} has been added to your cart."),
            Self::AlreadyInCart { name } => format!("{name} is already in your cart."),
            Self::AddedToWishlist { name } => format!("{name} has been added to your wishlist."),
            Self::RemovedFromWishlist => "Item has been removed from your wishlist.".to_owned(),
        }
    }

    #[must_use]
    pub const fn variant(&self) -> NotificationVariant {
        match self {
            Self::RemovedFromWishlist => NotificationVariant::Destructive,
            _ => NotificationVariant::Default,
        }
    }
}

/// The shopper's cart, wishlist and search history over a slot storage.
#[derive(Debug)]
pub struct ShopStore<S: SlotStorage> {
    storage: S,
    cart: Vec<CartEntry>,
    wishlist: Vec<Product>,
    recent_searches: Vec<String>,
}

impl<S: SlotStorage> ShopStore<S> {
    /// Open the store, rehydrating all slots from `storage`.
    pub fn open(storage: S) -> Self {
        let mut cart: Vec<CartEntry> = load(&storage, Slot::Cart);
        let mut seen = HashSet::new();
        cart.retain(|e| seen.insert(e.product.id.clone()));

        let mut wishlist: Vec<Product> = load(&storage, Slot::Wishlist);
        let mut seen = HashSet::new();
        wishlist.retain(|p| seen.insert(p.id.clone()));

        let mut recent_searches: Vec<String> = load(&storage, Slot::RecentSearches);
        recent_searches.truncate(MAX_RECENT_SEARCHES);

        Self {
            storage,
            cart,
            wishlist,
            recent_searches,
        }
    }

    /// Give back the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Underlying storage, e.g. to flush a buffering backend.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub fn cart(&self) -> &[CartEntry] {
        &self.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &[Product] {
        &self.wishlist
    }

    #[must_use]
    pub fn recent_searches(&self) -> &[String] {
        &self.recent_searches
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.cart.iter().map(|e| e.quantity.get()).sum()
    }

    #[must_use]
    pub fn cart_subtotal(&self) -> Price {
        self.cart.iter().map(CartEntry::line_total).sum()
    }

    #[must_use]
    pub fn is_in_cart(&self, id: &ProductId) -> bool {
        self.cart.iter().any(|e| &e.product.id == id)
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: &ProductId) -> bool {
        self.wishlist.iter().any(|p| &p.id == id)
    }

    /// Add one unit of `product`. A product already in the cart is left alone.
    pub fn add_to_cart(&mut self, product: &Product) -> Notification {
        let name = product.name.clone();
        if self.is_in_cart(&product.id) {
            return Notification::AlreadyInCart { name };
        }
        self.cart.push(CartEntry {
            product: product.clone(),
            quantity: Quantity::ONE,
        });
        self.persist(Slot::Cart);
        Notification::AddedToCart { name }
    }

    /// Drop a line from the cart. Returns whether anything was removed.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let before = self.cart.len();
        self.cart.retain(|e| &e.product.id != id);
        let removed = self.cart.len() != before;
        if removed {
            self.persist(Slot::Cart);
        }
        removed
    }

    /// Set a line's quantity. Out-of-range quantities are ignored.
    /// Returns whether the cart changed.
    pub fn update_cart_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        let Some(quantity) = Quantity::new(quantity) else {
            debug!(product_id = %id, quantity, "ignoring out-of-range quantity");
            return false;
        };
        let Some(entry) = self.cart.iter_mut().find(|e| &e.product.id == id) else {
            return false;
        };
        if entry.quantity == quantity {
            return false;
        }
        entry.quantity = quantity;
        self.persist(Slot::Cart);
        true
    }

    /// Empty the cart after a completed checkout. The wishlist is untouched.
    pub fn clear_cart(&mut self) {
        if !self.cart.is_empty() {
            self.cart.clear();
            self.persist(Slot::Cart);
        }
    }

    /// Toggle `product` in the wishlist.
    pub fn add_to_wishlist(&mut self, product: &Product) -> Notification {
        if self.is_in_wishlist(&product.id) {
            return self.remove_from_wishlist(&product.id);
        }
        self.wishlist.push(product.clone());
        self.persist(Slot::Wishlist);
        Notification::AddedToWishlist {
            name: product.name.clone(),
        }
    }

    pub fn remove_from_wishlist(&mut self, id: &ProductId) -> Notification {
        let before = self.wishlist.len();
        self.wishlist.retain(|p| &p.id != id);
        if self.wishlist.len() != before {
            self.persist(Slot::Wishlist);
        }
        Notification::RemovedFromWishlist
    }

    /// Remember a submitted query, most recent first.
    pub fn record_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        if self.recent_searches.first().is_some_and(|q| q == query) {
            return;
        }
        self.recent_searches.retain(|q| q != query);
        self.recent_searches.insert(0, query.to_owned());
        self.recent_searches.truncate(MAX_RECENT_SEARCHES);
        self.persist(Slot::RecentSearches);
    }

    pub fn clear_recent_searches(&mut self) {
        if !self.recent_searches.is_empty() {
            self.recent_searches.clear();
            self.persist(Slot::RecentSearches);
        }
    }

    fn persist(&mut self, slot: Slot) {
        let json = match slot {
            Slot::Cart => serde_json::to_string(&self.cart),
            Slot::Wishlist => serde_json::to_string(&self.wishlist),
            Slot::RecentSearches => serde_json::to_string(&self.recent_searches),
        };
        let json = match json {
            Ok(json) => json,
            Err(e) => {
                warn!(%slot, error = %e, "failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.write(slot, &json) {
            warn!(%slot, error = %e, "failed to persist snapshot");
        }
    }
}

fn load<S: SlotStorage, T: DeserializeOwned>(storage: &S, slot: Slot) -> Vec<T> {
    let raw = match storage.read(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(%slot, error = %e, "failed to read snapshot, starting empty");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(%slot, error = %e, "discarding unreadable snapshot");
        Vec::new()
    })
}
