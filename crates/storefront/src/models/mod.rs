//! Session-held state for the storefront.

pub mod session;

pub use session::{SessionSlots, keys as session_keys};
