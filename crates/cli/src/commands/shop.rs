//! `cg-cli cart|wishlist|recent` - the visitor store on disk.

use std::io::Write;

use celestial_gems_core::{Catalog, Notification, OrderSummary, Quantity, ShopStore, SlotStorage};

use super::product_by_slug;
use crate::error::CliError;

/// Cart actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Show,
    Add(String),
    Remove(String),
    Quantity(String, u32),
    Clear,
}

/// Wishlist actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    Show,
    Toggle(String),
}

/// Recent search actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecentAction {
    Show,
    Clear,
}

fn announce(out: &mut impl Write, notification: &Notification) -> Result<(), CliError> {
    writeln!(out, "{}: {}", notification.title(), notification.description())?;
    Ok(())
}

/// Run a cart action.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` for a slug not in the catalog and
/// `CliError::InvalidQuantity` for a quantity outside 1..=10.
pub fn cart<S: SlotStorage>(
    catalog: &Catalog,
    store: &mut ShopStore<S>,
    action: CartAction,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        CartAction::Show => return show_cart(store, out),
        CartAction::Add(slug) => {
            let product = product_by_slug(catalog, &slug)?;
            let notification = store.add_to_cart(product);
            announce(out, &notification)?;
        }
        CartAction::Remove(slug) => {
            let product = product_by_slug(catalog, &slug)?;
            store.remove_from_cart(&product.id);
            writeln!(out, "Removed {} from your cart.", product.name)?;
        }
        CartAction::Quantity(slug, n) => {
            let product = product_by_slug(catalog, &slug)?;
            let quantity = Quantity::new(n).ok_or(CliError::InvalidQuantity(n))?;
            if !store.is_in_cart(&product.id) {
                writeln!(out, "{} is not in your cart.", product.name)?;
                return Ok(());
            }
            store.update_cart_quantity(&product.id, quantity.get());
            writeln!(out, "{} quantity set to {quantity}.", product.name)?;
        }
        CartAction::Clear => {
            store.clear_cart();
            writeln!(out, "Cart cleared.")?;
        }
    }
    Ok(())
}

fn show_cart<S: SlotStorage>(store: &ShopStore<S>, out: &mut impl Write) -> Result<(), CliError> {
    if store.cart().is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }
    for entry in store.cart() {
        writeln!(
            out,
            "{:>2} x {:<28} {:>10}",
            entry.quantity.get(),
            entry.product.name,
            entry.line_total().to_string()
        )?;
    }
    let summary = OrderSummary::for_subtotal(store.cart_subtotal());
    writeln!(out, "Items:    {}", store.cart_item_count())?;
    writeln!(out, "Subtotal: {}", summary.subtotal)?;
    writeln!(out, "Shipping: {}", summary.shipping)?;
    writeln!(out, "Tax:      {}", summary.tax)?;
    writeln!(out, "Total:    {}", summary.total)?;
    Ok(())
}

/// Run a wishlist action.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` for a slug not in the catalog.
pub fn wishlist<S: SlotStorage>(
    catalog: &Catalog,
    store: &mut ShopStore<S>,
    action: WishlistAction,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        WishlistAction::Show => {
            if store.wishlist().is_empty() {
                writeln!(out, "Your wishlist is empty.")?;
            }
            for product in store.wishlist() {
                writeln!(out, "{:<28} {:>10}  {}", product.name, product.price.to_string(), product.slug)?;
            }
        }
        WishlistAction::Toggle(slug) => {
            let product = product_by_slug(catalog, &slug)?;
            let notification = store.add_to_wishlist(product);
            announce(out, &notification)?;
        }
    }
    Ok(())
}

/// Run a recent searches action.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn recent<S: SlotStorage>(
    store: &mut ShopStore<S>,
    action: RecentAction,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        RecentAction::Show => {
            if store.recent_searches().is_empty() {
                writeln!(out, "No recent searches.")?;
            }
            for query in store.recent_searches() {
                writeln!(out, "{query}")?;
            }
        }
        RecentAction::Clear => {
            store.clear_recent_searches();
            writeln!(out, "Recent searches cleared.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use celestial_gems_core::MemoryStorage;

    use super::super::fixtures::catalog;
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_add_twice_reports_already_in_cart() {
        let catalog = catalog();
        let mut store = ShopStore::open(MemoryStorage::new());

        let first = output(|out| cart(&catalog, &mut store, CartAction::Add("rolex-submariner".into()), out));
        assert!(first.starts_with("Added to Cart: Rolex Submariner"));

        let second = output(|out| cart(&catalog, &mut store, CartAction::Add("rolex-submariner".into()), out));
        assert!(second.starts_with("Already in Cart"));
        assert_eq!(store.cart_item_count(), 1);
    }

    #[test]
    fn test_show_cart_totals() {
        let catalog = catalog();
        let mut store = ShopStore::open(MemoryStorage::new());
        cart(&catalog, &mut store, CartAction::Add("tudor-black-bay-58".into()), &mut Vec::new()).unwrap();
        cart(&catalog, &mut store, CartAction::Quantity("tudor-black-bay-58".into(), 2), &mut Vec::new()).unwrap();

        let shown = output(|out| cart(&catalog, &mut store, CartAction::Show, out));
        assert!(shown.contains(" 2 x Tudor Black Bay 58"));
        assert!(shown.contains("Subtotal: $8200.00"));
        assert!(shown.contains("Items:    2"));
    }

    #[test]
    fn test_quantity_out_of_range() {
        let catalog = catalog();
        let mut store = ShopStore::open(MemoryStorage::new());
        let err = cart(&catalog, &mut store, CartAction::Quantity("rolex-submariner".into(), 11), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidQuantity(11)));
    }

    #[test]
    fn test_unknown_slug() {
        let catalog = catalog();
        let mut store = ShopStore::open(MemoryStorage::new());
        let err = wishlist(&catalog, &mut store, WishlistAction::Toggle("omega-speedmaster".into()), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, CliError::UnknownProduct(slug) if slug == "omega-speedmaster"));
    }

    #[test]
    fn test_wishlist_toggle_round_trip() {
        let catalog = catalog();
        let mut store = ShopStore::open(MemoryStorage::new());

        let added = output(|out| wishlist(&catalog, &mut store, WishlistAction::Toggle("grand-seiko-snowflake".into()), out));
        assert!(added.starts_with("Added to Wishlist"));
        assert_eq!(store.wishlist().len(), 1);

        let removed = output(|out| wishlist(&catalog, &mut store, WishlistAction::Toggle("grand-seiko-snowflake".into()), out));
        assert!(removed.starts_with("Removed from Wishlist"));
        assert!(store.wishlist().is_empty());
    }

    #[test]
    fn test_recent_clear() {
        let mut store = ShopStore::open(MemoryStorage::new());
        store.record_search("seiko");
        assert_eq!(output(|out| recent(&mut store, RecentAction::Show, out)), "seiko\n");
        recent(&mut store, RecentAction::Clear, &mut Vec::new()).unwrap();
        assert_eq!(output(|out| recent(&mut store, RecentAction::Show, out)), "No recent searches.\n");
    }
}
