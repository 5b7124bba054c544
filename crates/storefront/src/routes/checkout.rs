//! Checkout route handlers.
//!
//! Checkout is a plain form post. A valid order is emailed to the customer
//! and the shop, the cart is emptied, and the browser is redirected to the
//! confirmation page (post/redirect/get).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use celestial_gems_core::{ContactDetails, Email, OrderPayload, OrderSummary, PaymentMethod, Price};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::models::session_keys;
use crate::state::AppState;

use super::cart::CartView;
use super::views::Chrome;

/// Payment methods offered on the form, as `(value, label)`.
pub const PAYMENT_OPTIONS: &[(&str, &str)] = &[
    ("card", "Credit Card"),
    ("paypal", "PayPal"),
    ("zelle", "Zelle"),
    ("gift_card", "Gift Card"),
    ("venmo", "Venmo"),
    ("chime", "Chime"),
    ("apple_pay", "Apple Pay"),
];

const SEND_FAILED: &str = "We could not place your order right now. Please try again.";

/// Submitted checkout fields. Every field is optional on the wire so
/// validation can report all problems at once.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub payment_method: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvc: String,
    pub paypal_email: String,
    pub zelle_contact: String,
    pub gift_card_code: String,
    pub venmo_handle: String,
    pub chime_sign: String,
}

impl CheckoutForm {
    /// Copy safe to echo back into the form: card data is dropped.
    fn redisplay(&self) -> Self {
        Self {
            card_number: String::new(),
            expiry_date: String::new(),
            cvc: String::new(),
            gift_card_code: String::new(),
            ..self.clone()
        }
    }

    /// Validate into contact details and a payment method.
    ///
    /// # Errors
    ///
    /// Returns every validation message, in form order.
    pub fn validate(&self) -> std::result::Result<(ContactDetails, PaymentMethod), Vec<String>> {
        let mut errors = Vec::new();

        let mut required = |value: &str, label: &str| -> String {
            let value = value.trim();
            if value.is_empty() {
                errors.push(format!("{label} is required."));
            }
            value.to_string()
        };
        let name = required(&self.name, "Full name");
        let address = required(&self.address, "Address");
        let city = required(&self.city, "City");
        let state = required(&self.state, "State");
        let zip = required(&self.zip, "ZIP code");

        let email = Email::parse(&self.email)
            .map_err(|e| errors.push(format!("Email: {e}.")))
            .ok();

        let payment = self.payment(&mut errors);

        match (email, payment) {
            (Some(email), Some(payment)) if errors.is_empty() => Ok((
                ContactDetails {
                    name,
                    email,
                    address,
                    city,
                    state,
                    zip,
                },
                payment,
            )),
            _ => Err(errors),
        }
    }

    fn payment(&self, errors: &mut Vec<String>) -> Option<PaymentMethod> {
        let mut field = |value: &str, label: &str| -> Option<String> {
            let value = value.trim();
            if value.is_empty() {
                errors.push(format!("{label} is required."));
                None
            } else {
                Some(value.to_string())
            }
        };

        match self.payment_method.as_str() {
            "card" => {
                let card_number = field(&self.card_number, "Card number");
                let expiry_date = field(&self.expiry_date, "Expiry date");
                let cvc = field(&self.cvc, "CVC");
                let (card_number, expiry_date, cvc) = (card_number?, expiry_date?, cvc?);

                let digits = card_number.chars().filter(|c| !c.is_whitespace()).count();
                let card_ok = card_number
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_whitespace())
                    && (12..=19).contains(&digits);
                let cvc_ok = cvc.chars().all(|c| c.is_ascii_digit()) && (3..=4).contains(&cvc.len());
                if !card_ok {
                    errors.push("Card number must be 12 to 19 digits.".to_string());
                }
                if !cvc_ok {
                    errors.push("CVC must be 3 or 4 digits.".to_string());
                }
                (card_ok && cvc_ok).then_some(PaymentMethod::Card {
                    card_number,
                    expiry_date,
                    cvc,
                })
            }
            "paypal" => {
                let email = field(&self.paypal_email, "PayPal email")?;
                match Email::parse(&email) {
                    Ok(email) => Some(PaymentMethod::Paypal {
                        email: email.as_str().to_string(),
                    }),
                    Err(e) => {
                        errors.push(format!("PayPal email: {e}."));
                        None
                    }
                }
            }
            "zelle" => field(&self.zelle_contact, "Zelle email or phone")
                .map(|contact| PaymentMethod::Zelle { contact }),
            "gift_card" => {
                field(&self.gift_card_code, "Gift card code").map(|code| PaymentMethod::GiftCard { code })
            }
            "venmo" => {
                field(&self.venmo_handle, "Venmo handle").map(|handle| PaymentMethod::Venmo { handle })
            }
            "chime" => field(&self.chime_sign, "$ChimeSign").map(|sign| PaymentMethod::Chime { sign }),
            "apple_pay" => Some(PaymentMethod::ApplePay),
            "" => {
                errors.push("Choose a payment method.".to_string());
                None
            }
            other => {
                errors.push(format!("Unsupported payment method: {other}."));
                None
            }
        }
    }
}

/// One payment method choice on the form.
#[derive(Debug, Clone)]
pub struct PaymentOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn payment_options(selected: &str) -> Vec<PaymentOption> {
    PAYMENT_OPTIONS
        .iter()
        .map(|&(value, label)| PaymentOption {
            value,
            label,
            selected: value == selected,
        })
        .collect()
}

/// Order details kept in the session for the confirmation page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedOrder {
    pub reference: String,
    pub email: String,
    pub total: Price,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/checkout.html")]
pub struct CheckoutTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
    pub summary: OrderSummary,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
    pub payment_options: Vec<PaymentOption>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/order_complete.html")]
pub struct OrderCompleteTemplate {
    pub chrome: Chrome,
    pub order: CompletedOrder,
}

fn checkout_page(
    shopper: &Shopper,
    nonce: String,
    form: CheckoutForm,
    errors: Vec<String>,
) -> CheckoutTemplate {
    let cart = CartView::of(shopper);
    CheckoutTemplate {
        summary: OrderSummary::for_subtotal(cart.subtotal),
        cart,
        payment_options: payment_options(&form.payment_method),
        form,
        errors,
        chrome: Chrome::new(shopper, nonce),
    }
}

/// Display the checkout form. An empty cart goes back to the cart page.
#[instrument(skip(shopper, nonce))]
pub async fn show(shopper: Shopper, CspNonce(nonce): CspNonce) -> Response {
    if shopper.cart().is_empty() {
        return Redirect::to("/cart").into_response();
    }
    let form = CheckoutForm {
        payment_method: "card".to_string(),
        ..CheckoutForm::default()
    };
    checkout_page(&shopper, nonce, form, Vec::new()).into_response()
}

/// Place an order.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    mut shopper: Shopper,
    session: Session,
    CspNonce(nonce): CspNonce,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    if shopper.cart().is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let (customer, payment) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            tracing::debug!(errors = errors.len(), "Checkout form rejected");
            let page = checkout_page(&shopper, nonce, form.redisplay(), errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let order = OrderPayload::build(shopper.cart(), customer, payment)?;
    tracing::info!(
        reference = %order.reference,
        items = order.items.len(),
        total = %order.summary.total,
        method = order.payment.label(),
        "Placing order"
    );

    if let Err(err) = state.email().send_order_confirmation(&order).await {
        tracing::error!(reference = %order.reference, error = %err, "Order email failed");
        let page = checkout_page(&shopper, nonce, form.redisplay(), vec![SEND_FAILED.to_string()]);
        return Ok((StatusCode::BAD_GATEWAY, page).into_response());
    }

    shopper.clear_cart();
    shopper.save().await?;
    session
        .insert(
            session_keys::LAST_ORDER,
            CompletedOrder {
                reference: order.reference.clone(),
                email: order.customer.email.as_str().to_string(),
                total: order.summary.total,
            },
        )
        .await?;

    add_breadcrumb("checkout", "order placed", &[("reference", order.reference.as_str())]);
    Ok(Redirect::to("/checkout/complete").into_response())
}

/// Confirmation page for the most recent order in this session.
#[instrument(skip_all)]
pub async fn complete(
    shopper: Shopper,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let Some(order) = session
        .get::<CompletedOrder>(session_keys::LAST_ORDER)
        .await?
    else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(OrderCompleteTemplate {
        order,
        chrome: Chrome::new(&shopper, nonce),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            address: "123 Luxury Lane".to_string(),
            city: "Jewel City".to_string(),
            state: "CA".to_string(),
            zip: "90210".to_string(),
            payment_method: "card".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry_date: "12/30".to_string(),
            cvc: "123".to_string(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_valid_card_checkout() {
        let (contact, payment) = valid_form().validate().unwrap();
        assert_eq!(contact.email.as_str(), "jane@example.com");
        assert_eq!(payment.label(), "Credit Card");
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let form = CheckoutForm {
            payment_method: "card".to_string(),
            ..CheckoutForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("Full name")));
        assert!(errors.iter().any(|e| e.starts_with("Email")));
        assert!(errors.iter().any(|e| e.starts_with("Card number")));
        assert!(errors.iter().any(|e| e.starts_with("CVC")));
    }

    #[test]
    fn test_bad_card_number() {
        let form = CheckoutForm {
            card_number: "4242-abc".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Card number must be 12 to 19 digits."]);
    }

    #[test]
    fn test_method_specific_fields() {
        let form = CheckoutForm {
            payment_method: "venmo".to_string(),
            venmo_handle: "@jane".to_string(),
            card_number: String::new(),
            ..valid_form()
        };
        let (_, payment) = form.validate().unwrap();
        assert_eq!(
            payment,
            PaymentMethod::Venmo {
                handle: "@jane".to_string()
            }
        );

        let form = CheckoutForm {
            payment_method: "apple_pay".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap().1, PaymentMethod::ApplePay);
    }

    #[test]
    fn test_unknown_method_rejected() {
        let form = CheckoutForm {
            payment_method: "bitcoin".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Unsupported payment method: bitcoin."]);
    }

    #[test]
    fn test_redisplay_drops_card_data() {
        let form = valid_form().redisplay();
        assert!(form.card_number.is_empty());
        assert!(form.cvc.is_empty());
        assert_eq!(form.name, "Jane Doe");
    }
}
