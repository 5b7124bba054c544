//! Order payload construction.
//!
//! [`OrderPayload::build`] turns cart contents plus the submitted contact and
//! payment fields into the record that is handed to the mailer. It performs
//! no I/O.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::CartEntry;
use crate::types::{Email, Price, ProductId};

/// Flat shipping fee, in cents.
const SHIPPING_CENTS: i64 = 2_500;

/// Sales tax rate (8%).
fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Shipping contact submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Chosen payment method with the fields that method needs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card {
        card_number: String,
        expiry_date: String,
        cvc: String,
    },
    Paypal {
        email: String,
    },
    Zelle {
        contact: String,
    },
    GiftCard {
        code: String,
    },
    Venmo {
        handle: String,
    },
    Chime {
        sign: String,
    },
    ApplePay,
}

impl PaymentMethod {
    /// Customer-facing method name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card { .. } => "Credit Card",
            Self::Paypal { .. } => "PayPal",
            Self::Zelle { .. } => "Zelle",
            Self::GiftCard { .. } => "Gift Card",
            Self::Venmo { .. } => "Venmo",
            Self::Chime { .. } => "Chime",
            Self::ApplePay => "Apple Pay",
        }
    }

    /// Label/value pairs for the back-office copy of an order.
    ///
    /// Card numbers are reduced to their last four digits and the CVC and
    /// expiry never appear.
    #[must_use]
    pub fn admin_details(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Card { card_number, .. } => vec![("Card Number", mask(card_number))],
            Self::Paypal { email } => vec![("PayPal Email", email.clone())],
            Self::Zelle { contact } => vec![("Zelle Contact", contact.clone())],
            Self::GiftCard { code } => vec![("Gift Card", mask(code))],
            Self::Venmo { handle } => vec![("Venmo Handle", handle.clone())],
            Self::Chime { sign } => vec![("Chime $ChimeSign", sign.clone())],
            Self::ApplePay => vec![(
                "Apple Pay",
                "Transaction processed via Apple Pay.".to_owned(),
            )],
        }
    }
}

// Card data must never reach logs through `{:?}`.
impl fmt::Debug for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card { card_number, .. } => f
                .debug_struct("Card")
                .field("card_number", &mask(card_number))
                .field("expiry_date", &"[REDACTED]")
                .field("cvc", &"[REDACTED]")
                .finish(),
            Self::GiftCard { code } => f.debug_struct("GiftCard").field("code", &mask(code)).finish(),
            other => f
                .debug_struct(other.label())
                .field("details", &other.admin_details())
                .finish(),
        }
    }
}

/// `...1234` from the trailing four digits of a number.
fn mask(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_alphanumeric).collect();
    let tail: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
    format!("...{tail}")
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub subtotal: Price,
}

impl From<&CartEntry> for LineItem {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id.clone(),
            name: entry.product.name.clone(),
            image_url: entry.product.image.image_url.clone(),
            unit_price: entry.product.price,
            quantity: entry.quantity.get(),
            subtotal: entry.line_total(),
        }
    }
}

/// Money totals for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Totals for a cart subtotal: flat $25 shipping and 8% tax.
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        let shipping = Price::from_cents(SHIPPING_CENTS);
        let tax = subtotal.percent(tax_rate());
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// A placed order, ready to be emailed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Human-friendly order reference (`CG-1A2B3C4D`).
    pub reference: String,
    pub placed_at: DateTime<Utc>,
    pub customer: ContactDetails,
    pub items: Vec<LineItem>,
    pub summary: OrderSummary,
    pub payment: PaymentMethod,
}

impl OrderPayload {
    /// Build an order from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if `cart` has no entries.
    pub fn build(
        cart: &[CartEntry],
        customer: ContactDetails,
        payment: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let items: Vec<LineItem> = cart.iter().map(LineItem::from).collect();
        let subtotal = items.iter().map(|i| i.subtotal).sum();

        Ok(Self {
            reference: new_reference(),
            placed_at: Utc::now(),
            customer,
            items,
            summary: OrderSummary::for_subtotal(subtotal),
            payment,
        })
    }
}

fn new_reference() -> String {
    let hex: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("CG-{}", hex.to_uppercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::catalog::fixtures::product;
    use crate::store::Quantity;

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Jane Doe".into(),
            email: Email::parse("jane@example.com").unwrap(),
            address: "123 Luxury Lane".into(),
            city: "Jewel City".into(),
            state: "CA".into(),
            zip: "90210".into(),
        }
    }

    fn card() -> PaymentMethod {
        PaymentMethod::Card {
            card_number: "4242 4242 4242 4444".into(),
            expiry_date: "12/30".into(),
            cvc: "987".into(),
        }
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert_eq!(
            OrderPayload::build(&[], contact(), PaymentMethod::ApplePay),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn builds_lines_and_summary() {
        let cart = vec![
            CartEntry {
                product: product("1", "Omega Seamaster", Category::Swiss, "Omega", 10_000),
                quantity: Quantity::ONE,
            },
            CartEntry {
                product: product("2", "Seiko 5", Category::Japanese, "Seiko", 5_000),
                quantity: Quantity::new(2).unwrap(),
            },
        ];
        let order = OrderPayload::build(&cart, contact(), card()).unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].quantity, 2);
        assert_eq!(order.items[1].subtotal, Price::from_cents(10_000));
        assert_eq!(order.summary.subtotal, Price::from_cents(20_000));
        assert_eq!(order.summary.shipping, Price::from_cents(2_500));
        assert_eq!(order.summary.tax, Price::from_cents(1_600));
        assert_eq!(order.summary.total.to_string(), "$241.00");
    }

    #[test]
    fn reference_format() {
        let reference = new_reference();
        assert!(reference.starts_with("CG-"));
        let hex = reference.trim_start_matches("CG-");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn admin_details_mask_card_and_hide_cvc() {
        let details = card().admin_details();
        assert_eq!(details, [("Card Number", "...4444".to_owned())]);
        let debug = format!("{:?}", card());
        assert!(!debug.contains("987"));
        assert!(!debug.contains("4242"));
    }

    #[test]
    fn payment_serializes_tagged() {
        let json = serde_json::to_value(PaymentMethod::Venmo {
            handle: "@jane".into(),
        })
        .unwrap();
        assert_eq!(json["method"], "venmo");
        assert_eq!(json["handle"], "@jane");
        assert_eq!(PaymentMethod::ApplePay.label(), "Apple Pay");
    }
}
