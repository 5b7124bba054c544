//! Weighted typeahead scoring.
//!
//! Each product earns points from independent signals and the catalog is
//! ranked by total score:
//!
//! | signal                               | weight |
//! |--------------------------------------|--------|
//! | name contains query                  | 10     |
//! | a name word starts with query        | 5      |
//! | category contains query              | 3      |
//! | brand contains query                 | 2      |
//! | model type contains query            | 1      |
//!
//! Matching is case-insensitive on the trimmed query. Ties keep catalog order.

use crate::catalog::{Catalog, Product};

/// Maximum number of typeahead suggestions.
pub const MAX_SUGGESTIONS: usize = 8;

const NAME_CONTAINS: u32 = 10;
const NAME_WORD_PREFIX: u32 = 5;
const CATEGORY_CONTAINS: u32 = 3;
const BRAND_CONTAINS: u32 = 2;
const MODEL_TYPE_CONTAINS: u32 = 1;

/// A product with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredProduct<'a> {
    pub product: &'a Product,
    pub score: u32,
}

/// Score a single product against an already lowercased, trimmed query.
fn score(product: &Product, needle: &str) -> u32 {
    let name = product.name.to_lowercase();
    let mut total = 0;
    if name.contains(needle) {
        total += NAME_CONTAINS;
    }
    if name.split_whitespace().any(|word| word.starts_with(needle)) {
        total += NAME_WORD_PREFIX;
    }
    if product.category.as_str().to_lowercase().contains(needle) {
        total += CATEGORY_CONTAINS;
    }
    if product.brand.to_lowercase().contains(needle) {
        total += BRAND_CONTAINS;
    }
    if product
        .model_type
        .is_some_and(|m| m.as_str().to_lowercase().contains(needle))
    {
        total += MODEL_TYPE_CONTAINS;
    }
    total
}

/// Every matching product, best first.
#[must_use]
pub fn rank<'a>(catalog: &'a Catalog, query: &str) -> Vec<ScoredProduct<'a>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<_> = catalog
        .products()
        .iter()
        .map(|product| ScoredProduct {
            product,
            score: score(product, &needle),
        })
        .filter(|s| s.score > 0)
        .collect();
    // `sort_by` is stable, so equal scores keep catalog order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Top [`MAX_SUGGESTIONS`] matches for typeahead.
#[must_use]
pub fn suggest<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Product> {
    rank(catalog, query)
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|s| s.product)
        .collect()
}
