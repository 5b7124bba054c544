//! CelestialGems Core - Domain library.
//!
//! This crate provides the domain model shared by every CelestialGems component:
//! - `storefront` - Public-facing web store (axum)
//! - `cli` - Command-line client for catalog, cart and SEO tooling
//!
//! # Architecture
//!
//! The core crate contains types, pure transformations and traits - no network,
//! no database, no templates. Persistence goes through the [`SlotStorage`]
//! trait so each host decides where snapshots live (session, files, memory).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and email addresses
//! - [`catalog`] - Static product catalog with brand and category lookups
//! - [`storage`] - Named snapshot slots (`cart`, `wishlist`, `recentSearches`)
//! - [`store`] - Cart/wishlist context object with durable snapshots
//! - [`search`] - Weighted typeahead scorer
//! - [`checkout`] - Order payload builder

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod search;
pub mod storage;
pub mod store;
pub mod types;

pub use catalog::{
    Brand, BrandLineup, Catalog, CatalogError, Category, CategoryInfo, ModelType, Product,
    ProductImage,
};
pub use checkout::{
    CheckoutError, ContactDetails, LineItem, OrderPayload, OrderSummary, PaymentMethod,
};
pub use search::{MAX_SUGGESTIONS, ScoredProduct, rank, suggest};
pub use storage::{MemoryStorage, Slot, SlotStorage, StorageError};
pub use store::{CartEntry, Notification, NotificationVariant, Quantity, ShopStore};
pub use types::*;
