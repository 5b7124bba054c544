//! `cg-cli catalog` - list products.

use std::io::Write;

use celestial_gems_core::{Catalog, Category};

use crate::error::CliError;

/// Print the catalog, optionally filtered by category and trending flag.
///
/// # Errors
///
/// Returns `CliError::UnknownCategory` for an unrecognised category name.
pub fn list(
    catalog: &Catalog,
    category: Option<&str>,
    trending: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let category = category
        .map(|name| Category::parse(name).ok_or_else(|| CliError::UnknownCategory(name.to_owned())))
        .transpose()?;

    let products = catalog
        .products()
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| !trending || p.is_trending);

    let mut shown = 0usize;
    for product in products {
        writeln!(
            out,
            "{:<28} {:<14} {:<9} {:>10}  {}",
            product.name, product.brand, product.category, product.price.to_string(), product.slug
        )?;
        shown += 1;
    }
    writeln!(out, "{shown} product(s)")?;
    Ok(())
}
