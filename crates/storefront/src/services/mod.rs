//! Outbound services: order email and SEO suggestions.

pub mod email;
pub mod seo;

pub use email::{EmailService, MailError, Recipient};
pub use seo::{SeoError, SeoService, SeoSuggestion};
