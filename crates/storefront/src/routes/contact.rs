//! Contact page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::{CspNonce, Shopper};

use super::views::Chrome;

/// Shop contact details shown on the page.
pub struct ContactInfo {
    pub email: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
}

pub const CONTACT: ContactInfo = ContactInfo {
    email: "support@celestialgems.com",
    phone: "(123) 456-7890",
    address: "123 Elegance Avenue, Jewel City, 90210",
};

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub chrome: Chrome,
    pub contact: &'static ContactInfo,
}

#[instrument(skip(shopper, nonce))]
pub async fn show(shopper: Shopper, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    ContactTemplate {
        contact: &CONTACT,
        chrome: Chrome::new(&shopper, nonce),
    }
}
