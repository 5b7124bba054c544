//! `cg-cli migrate` - create the session table.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use celestial_gems_storefront::db;
use secrecy::SecretString;

use crate::error::CliError;

/// Run the tower-sessions schema migration.
///
/// # Errors
///
/// Returns an error if no database URL is set or the migration fails.
pub async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running session store migration...");
    db::migrate_sessions(&pool).await?;

    tracing::info!("Session store migration complete!");
    Ok(())
}
