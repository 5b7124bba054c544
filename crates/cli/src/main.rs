//! CelestialGems CLI - catalog, cart and SEO tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! cg-cli catalog --category japanese
//! cg-cli search "seamaster"
//!
//! # Cart and wishlist, kept in --state-dir
//! cg-cli cart add rolex-submariner
//! cg-cli cart quantity rolex-submariner 2
//! cg-cli cart show
//! cg-cli wishlist toggle grand-seiko-snowflake
//! cg-cli recent clear
//!
//! # SEO suggestions (needs CLAUDE_API_KEY)
//! cg-cli seo omega-speedmaster
//!
//! # Create the Postgres session table
//! cg-cli migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use celestial_gems_core::ShopStore;
use celestial_gems_storefront::{config::DEFAULT_CATALOG_PATH, content};
use clap::{Parser, Subcommand};

mod commands;
mod error;
mod storage;

use commands::shop::{CartAction, RecentAction, WishlistAction};
use error::CliError;
use storage::{DEFAULT_STATE_DIR, FileStorage};

#[derive(Parser)]
#[command(name = "cg-cli")]
#[command(author, version, about = "CelestialGems CLI tools")]
struct Cli {
    /// Product catalog JSON
    #[arg(long, global = true, env = "CATALOG_PATH", default_value = DEFAULT_CATALOG_PATH)]
    catalog: PathBuf,

    /// Directory holding the cart, wishlist and recent searches
    #[arg(long, global = true, default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog {
        /// Only this category (Swiss, Japanese, Other)
        #[arg(short, long)]
        category: Option<String>,

        /// Only trending products
        #[arg(short, long)]
        trending: bool,
    },
    /// Search the catalog and remember the query
    Search {
        /// Search text
        query: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },
    /// Show or clear recent searches
    Recent {
        #[command(subcommand)]
        action: RecentCommand,
    },
    /// Generate SEO keywords and description for a product
    Seo {
        /// Product slug
        slug: String,
    },
    /// Create the Postgres session table
    Migrate,
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show cart lines and totals
    Show,
    /// Add a product
    Add { slug: String },
    /// Remove a product
    Remove { slug: String },
    /// Set a line quantity (1-10)
    Quantity { slug: String, quantity: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistCommand {
    /// Show the wishlist
    Show,
    /// Add or remove a product
    Toggle { slug: String },
}

#[derive(Subcommand)]
enum RecentCommand {
    /// Show recent searches
    Show,
    /// Forget recent searches
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if matches!(cli.command, Commands::Migrate) {
        return commands::migrate::run().await;
    }

    let catalog = content::load_catalog(&cli.catalog)?;
    let mut store = ShopStore::open(FileStorage::new(&cli.state_dir));

    match cli.command {
        Commands::Catalog { category, trending } => {
            commands::catalog::list(&catalog, category.as_deref(), trending, &mut out)?;
        }
        Commands::Search { query } => {
            commands::search::run(&catalog, &mut store, &query, &mut out)?;
        }
        Commands::Cart { action } => {
            let action = match action {
                CartCommand::Show => CartAction::Show,
                CartCommand::Add { slug } => CartAction::Add(slug),
                CartCommand::Remove { slug } => CartAction::Remove(slug),
                CartCommand::Quantity { slug, quantity } => CartAction::Quantity(slug, quantity),
                CartCommand::Clear => CartAction::Clear,
            };
            commands::shop::cart(&catalog, &mut store, action, &mut out)?;
        }
        Commands::Wishlist { action } => {
            let action = match action {
                WishlistCommand::Show => WishlistAction::Show,
                WishlistCommand::Toggle { slug } => WishlistAction::Toggle(slug),
            };
            commands::shop::wishlist(&catalog, &mut store, action, &mut out)?;
        }
        Commands::Recent { action } => {
            let action = match action {
                RecentCommand::Show => RecentAction::Show,
                RecentCommand::Clear => RecentAction::Clear,
            };
            commands::shop::recent(&mut store, action, &mut out)?;
        }
        Commands::Seo { slug } => commands::seo::run(&catalog, &slug, &mut out).await?,
        Commands::Migrate => {}
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
