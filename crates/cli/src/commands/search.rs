//! `cg-cli search` - ranked search, recorded as a recent search.

use std::io::Write;

use celestial_gems_core::{Catalog, ShopStore, SlotStorage, rank};

use crate::error::CliError;

/// Print ranked results for `query` and remember it.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn run<S: SlotStorage>(
    catalog: &Catalog,
    store: &mut ShopStore<S>,
    query: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    store.record_search(query);

    let results = rank(catalog, query);
    if results.is_empty() {
        writeln!(out, "No watches match \"{}\".", query.trim())?;
        return Ok(());
    }
    for scored in &results {
        writeln!(
            out,
            "{:>3}  {:<28} {:>10}  {}",
            scored.score, scored.product.name, scored.product.price.to_string(), scored.product.slug
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use celestial_gems_core::MemoryStorage;

    use super::super::fixtures::catalog;
    use super::*;

    #[test]
    fn test_prints_matches_and_records_query() {
        let mut store = ShopStore::open(MemoryStorage::new());
        let mut out = Vec::new();
        run(&catalog(), &mut store, "rolex", &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Rolex Submariner"));
        assert_eq!(store.recent_searches(), ["rolex"]);
    }

    #[test]
    fn test_no_matches() {
        let mut store = ShopStore::open(MemoryStorage::new());
        let mut out = Vec::new();
        run(&catalog(), &mut store, "pocket watch", &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No watches match \"pocket watch\".\n"
        );
    }
}
