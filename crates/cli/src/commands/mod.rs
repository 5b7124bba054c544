//! Command implementations.
//!
//! Commands write their report to any `io::Write` so tests can capture it.

pub mod catalog;
pub mod migrate;
pub mod search;
pub mod seo;
pub mod shop;

use celestial_gems_core::{Catalog, Product};

use crate::error::CliError;

/// Look a product up by slug.
pub(crate) fn product_by_slug<'a>(catalog: &'a Catalog, slug: &str) -> Result<&'a Product, CliError> {
    catalog
        .find_by_slug(slug)
        .ok_or_else(|| CliError::UnknownProduct(slug.to_owned()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use celestial_gems_core::Catalog;

    pub const CATALOG_JSON: &str = r#"[
        {"id": "1", "name": "Rolex Submariner", "slug": "rolex-submariner", "category": "Swiss",
         "description": "Iconic dive watch.", "longDescription": "The reference dive watch.",
         "price": "10150.00", "image": {"imageUrl": "https://images.example.com/1.jpg", "imageHint": "dive watch"},
         "brand": "Rolex", "modelType": "Professional", "isTrending": true, "keywords": ["diver"]},
        {"id": "2", "name": "Grand Seiko Snowflake", "slug": "grand-seiko-snowflake", "category": "Japanese",
         "description": "Spring Drive elegance.", "longDescription": "A textured snowflake dial.",
         "price": "5800.00", "image": {"imageUrl": "https://images.example.com/2.jpg"},
         "brand": "Grand Seiko"},
        {"id": "3", "name": "Tudor Black Bay 58", "slug": "tudor-black-bay-58", "category": "Other",
         "description": "Vintage-inspired diver.", "price": "4100.00",
         "image": {"imageUrl": "https://images.example.com/3.jpg"}, "brand": "Tudor"}
    ]"#;

    pub fn catalog() -> Catalog {
        Catalog::from_json(CATALOG_JSON).unwrap_or_default()
    }
}
