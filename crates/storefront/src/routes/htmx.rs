//! HTMX request detection and response triggers.

use std::fmt::Write as _;

use axum::{extract::FromRequestParts, http::request::Parts};
use celestial_gems_core::Notification;
use serde_json::{Map, Value, json};

/// `true` when the request was issued by HTMX (`HX-Request: true`).
#[derive(Debug, Clone, Copy)]
pub struct Htmx(pub bool);

impl<S> FromRequestParts<S> for Htmx
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get("hx-request")
            .is_some_and(|v| v.as_bytes() == b"true");
        Ok(Self(is_htmx))
    }
}

/// Client-side events carried in `HX-Trigger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    CartUpdated,
    WishlistUpdated,
}

impl Event {
    const fn name(self) -> &'static str {
        match self {
            Self::CartUpdated => "cart-updated",
            Self::WishlistUpdated => "wishlist-updated",
        }
    }
}

/// Build an `HX-Trigger` header value.
///
/// The value is a JSON object with one key per event plus an optional
/// `toast` payload. Non-ASCII characters are `\u` escaped so the result is
/// always a valid header value.
#[must_use]
pub fn trigger(events: &[Event], toast: Option<&Notification>) -> String {
    let mut map = Map::new();
    for event in events {
        map.insert(event.name().to_string(), Value::Bool(true));
    }
    if let Some(notification) = toast {
        map.insert(
            "toast".to_string(),
            json!({
                "title": notification.title(),
                "description": notification.description(),
                "variant": notification.variant(),
            }),
        );
    }
    ascii_only(&Value::Object(map).to_string())
}

fn ascii_only(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    out
}
