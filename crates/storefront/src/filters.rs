//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// URL slug for a display name.
///
/// Usage in templates: `{{ product.brand|slug }}`
#[askama::filter_fn]
pub fn slug(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(celestial_gems_core::catalog::slugify(&value.to_string()))
}
