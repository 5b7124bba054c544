//! `cg-cli seo` - ask Claude for keywords and a better description.

use std::io::Write;

use celestial_gems_core::Catalog;
use celestial_gems_storefront::claude::ClaudeClient;
use celestial_gems_storefront::config::ClaudeConfig;
use celestial_gems_storefront::services::{SeoService, SeoSuggestion};

use super::product_by_slug;
use crate::error::CliError;

/// Generate suggestions for the product with `slug`.
///
/// # Errors
///
/// Returns `CliError::SeoDisabled` without `CLAUDE_API_KEY`, or the
/// underlying Claude failure.
pub async fn run(catalog: &Catalog, slug: &str, out: &mut impl Write) -> Result<(), CliError> {
    let product = product_by_slug(catalog, slug)?;
    let config = ClaudeConfig::from_env()?.ok_or(CliError::SeoDisabled)?;
    let service = SeoService::new(ClaudeClient::new(&config)?);

    tracing::info!(product = %product.slug, "Requesting SEO suggestions...");
    let suggestion = service
        .suggest(&product.name, &product.long_description)
        .await?;
    print_suggestion(&suggestion, out)
}

fn print_suggestion(suggestion: &SeoSuggestion, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "Keywords: {}", suggestion.keywords.join(", "))?;
    writeln!(out)?;
    writeln!(out, "{}", suggestion.optimized_description)?;
    Ok(())
}
