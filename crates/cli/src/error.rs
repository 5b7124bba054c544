//! CLI error type.

use celestial_gems_core::StorageError;
use celestial_gems_storefront::claude::ClaudeError;
use celestial_gems_storefront::config::ConfigError;
use celestial_gems_storefront::content::ContentError;
use celestial_gems_storefront::services::SeoError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// No product has the given slug.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Quantity outside 1..=10.
    #[error("Quantity must be between 1 and 10, got {0}")]
    InvalidQuantity(u32),

    /// Unknown category name.
    #[error("Unknown category: {0}. Valid categories: Swiss, Japanese, Other")]
    UnknownCategory(String),

    /// The SEO command needs `CLAUDE_API_KEY`.
    #[error("SEO suggestions need CLAUDE_API_KEY to be set")]
    SeoDisabled,

    /// Claude client could not be built.
    #[error(transparent)]
    Claude(#[from] ClaudeError),

    /// Suggestion request failed.
    #[error(transparent)]
    Seo(#[from] SeoError),

    /// State directory error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failed writing output.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
