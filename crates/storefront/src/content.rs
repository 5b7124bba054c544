//! Product catalog loading.
//!
//! The catalog is a JSON array of products in `content/catalog.json`, read
//! once at startup. A broken catalog is a startup error, not an empty shop.

use std::path::{Path, PathBuf};

use celestial_gems_core::{Catalog, CatalogError};
use thiserror::Error;

/// Errors loading content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog {path}: {source}")]
    Catalog { path: PathBuf, source: CatalogError },
}

/// Read and validate the catalog at `path`.
///
/// # Errors
///
/// Returns `ContentError` if the file is unreadable or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ContentError> {
    let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&json).map_err(|source| ContentError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        products = catalog.len(),
        brands = catalog.brands().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipped_catalog_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("content/catalog.json")
    }

    #[test]
    fn test_shipped_catalog_is_valid() {
        let catalog = load_catalog(&shipped_catalog_path()).unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.trending().next().is_some());
        assert!(catalog.find_by_slug("rolex-submariner").is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn test_invalid_catalog() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        let err = load_catalog(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ContentError::Catalog { .. }));
    }
}
