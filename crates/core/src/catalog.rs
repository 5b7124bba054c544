//! Static product catalog.
//!
//! The catalog is reference data: it is loaded once at startup from a JSON
//! document and never mutated afterwards. Brands and category summaries are
//! derived from the products rather than stored separately.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Errors raised while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("duplicate product slug: {0}")]
    DuplicateSlug(String),
    #[error("product {0} must have a positive price")]
    InvalidPrice(ProductId),
}

/// Watch origin category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Swiss,
    Japanese,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Swiss, Self::Japanese, Self::Other];

    /// Display name, also used as the URL segment (lowercased).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Swiss => "Swiss",
            Self::Japanese => "Japanese",
            Self::Other => "Other",
        }
    }

    /// Parse a category from a case-insensitive name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }

    const fn blurb(self) -> &'static str {
        match self {
            Self::Swiss => "Precision and heritage from the masters of Swiss watchmaking.",
            Self::Japanese => "Innovation and meticulous craftsmanship from Japan.",
            Self::Other => "Distinctive timepieces from independent and global makers.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product line within a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    Professional,
    Classic,
}

impl ModelType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Classic => "Classic",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Absolute or site-relative image URL.
    pub image_url: String,
    /// Short alt/art-direction hint ("dive watch").
    #[serde(default)]
    pub image_hint: String,
}

/// A catalog product.
///
/// Field names serialize in camelCase so persisted snapshots keep the shape
/// the storefront has always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub price: Price,
    pub image: ProductImage,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<ModelType>,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// A brand derived from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub name: String,
    pub slug: String,
    pub category: Category,
}

/// Summary card for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: Category,
    pub description: &'static str,
    pub image: Option<ProductImage>,
}

/// Products of one brand, split by model line.
#[derive(Debug, Clone, Default)]
pub struct BrandLineup<'a> {
    pub professional: Vec<&'a Product>,
    pub classic: Vec<&'a Product>,
    pub other: Vec<&'a Product>,
}

impl BrandLineup<'_> {
    /// True when at least one product carries a model type.
    #[must_use]
    pub fn has_model_types(&self) -> bool {
        !self.professional.is_empty() || !self.classic.is_empty()
    }
}

/// The product catalog, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, validating uniqueness and prices.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids or slugs, or a non-positive price.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for product in &products {
            if !ids.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(product.slug.clone()));
            }
            if !product.price.is_positive() {
                return Err(CatalogError::InvalidPrice(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Products flagged as trending.
    pub fn trending(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_trending)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Category summary cards, one per category, with the first product's image.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryInfo> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryInfo {
                category,
                description: category.blurb(),
                image: self.by_category(category).next().map(|p| p.image.clone()),
            })
            .collect()
    }

    /// Distinct brands in order of first appearance.
    #[must_use]
    pub fn brands(&self) -> Vec<Brand> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .filter(|p| seen.insert(p.brand.as_str()))
            .map(|p| Brand {
                name: p.brand.clone(),
                slug: slugify(&p.brand),
                category: p.category,
            })
            .collect()
    }

    #[must_use]
    pub fn find_brand(&self, slug: &str) -> Option<Brand> {
        self.brands().into_iter().find(|b| b.slug == slug)
    }

    /// Products of `brand`, grouped by model type.
    #[must_use]
    pub fn brand_lineup(&self, brand: &Brand) -> BrandLineup<'_> {
        let mut lineup = BrandLineup::default();
        for product in self.products.iter().filter(|p| p.brand == brand.name) {
            match product.model_type {
                Some(ModelType::Professional) => lineup.professional.push(product),
                Some(ModelType::Classic) => lineup.classic.push(product),
                None => lineup.other.push(product),
            }
        }
        lineup
    }
}

/// Lowercase `name` and collapse every run of non-alphanumerics into `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(id: &str, name: &str, category: Category, brand: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            slug: slugify(name),
            category,
            description: format!("The {name}."),
            long_description: format!("The {name}, in detail."),
            price: Price::from_cents(cents),
            image: ProductImage {
                image_url: format!("https://images.example.com/{id}.jpg"),
                image_hint: "watch".to_string(),
            },
            brand: brand.to_string(),
            model_type: None,
            is_trending: false,
            keywords: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::fixtures::product;
    use super::*;

    fn sample() -> Catalog {
        let mut sub = product("1", "Rolex Submariner", Category::Swiss, "Rolex", 1_015_000);
        sub.model_type = Some(ModelType::Professional);
        sub.is_trending = true;
        let mut dj = product("2", "Rolex Datejust", Category::Swiss, "Rolex", 800_000);
        dj.model_type = Some(ModelType::Classic);
        let gs = product("3", "Grand Seiko Snowflake", Category::Japanese, "Grand Seiko", 580_000);
        let cel = product("4", "Rolex Cellini", Category::Swiss, "Rolex", 1_500_000);
        Catalog::new(vec![sub, dj, gs, cel]).unwrap()
    }

    #[test]
    fn rejects_duplicate_ids_and_slugs() {
        let a = product("1", "Omega Seamaster", Category::Swiss, "Omega", 100);
        let mut b = product("1", "Omega Speedmaster", Category::Swiss, "Omega", 100);
        assert!(matches!(
            Catalog::new(vec![a.clone(), b.clone()]),
            Err(CatalogError::DuplicateId(_))
        ));

        b.id = ProductId::new("2");
        b.slug = a.slug.clone();
        assert!(matches!(
            Catalog::new(vec![a, b]),
            Err(CatalogError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn rejects_zero_price() {
        let free = product("9", "Free Watch", Category::Other, "Acme", 0);
        assert!(matches!(
            Catalog::new(vec![free]),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"[{
            "id": "1",
            "name": "Seiko Presage",
            "slug": "seiko-presage",
            "category": "Japanese",
            "description": "Cocktail time.",
            "longDescription": "Enamel dial.",
            "price": "425.00",
            "image": {"imageUrl": "/static/img/presage.jpg", "imageHint": "dress watch"},
            "brand": "Seiko",
            "modelType": "Classic",
            "isTrending": true
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let presage = catalog.find_by_slug("seiko-presage").unwrap();
        assert_eq!(presage.model_type, Some(ModelType::Classic));
        assert_eq!(presage.price, Price::from_cents(42_500));
        assert_eq!(catalog.trending().count(), 1);
    }

    #[test]
    fn brands_are_distinct_in_first_seen_order() {
        let brands = sample().brands();
        let names: Vec<_> = brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Rolex", "Grand Seiko"]);
        assert_eq!(brands[1].slug, "grand-seiko");
        assert_eq!(brands[1].category, Category::Japanese);
    }

    #[test]
    fn brand_lineup_groups_by_model_type() {
        let catalog = sample();
        let rolex = catalog.find_brand("rolex").unwrap();
        let lineup = catalog.brand_lineup(&rolex);
        assert!(lineup.has_model_types());
        assert_eq!(lineup.professional[0].name, "Rolex Submariner");
        assert_eq!(lineup.classic[0].name, "Rolex Datejust");
        assert_eq!(lineup.other[0].name, "Rolex Cellini");
    }

    #[test]
    fn categories_take_first_product_image() {
        let cards = sample().categories();
        assert_eq!(cards.len(), 3);
        assert!(cards[0].image.as_ref().unwrap().image_url.ends_with("/1.jpg"));
        assert!(cards[2].image.is_none());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Grand Seiko"), "grand-seiko");
        assert_eq!(slugify("  A. Lange & Söhne "), "a-lange-söhne");
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("swiss"), Some(Category::Swiss));
        assert_eq!(Category::parse("JAPANESE"), Some(Category::Japanese));
        assert_eq!(Category::parse("german"), None);
    }
}
