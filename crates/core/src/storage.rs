//! Named snapshot slots.
//!
//! A [`SlotStorage`] is a tiny key-value surface with three fixed keys. Each
//! slot holds one JSON document. The store decides what goes in a slot; the
//! storage only moves strings.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Errors raised by a slot storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A persisted slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Cart,
    Wishlist,
    RecentSearches,
}

impl Slot {
    pub const ALL: [Self; 3] = [Self::Cart, Self::Wishlist, Self::RecentSearches];

    /// Storage key for this slot.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
            Self::RecentSearches => "recentSearches",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Backend that keeps slot snapshots.
pub trait SlotStorage {
    /// Read the raw snapshot for `slot`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, slot: Slot) -> Result<Option<String>, StorageError>;

    /// Replace the snapshot for `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for &mut S {
    fn read(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        (**self).read(slot)
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError> {
        (**self).write(slot, value)
    }
}

/// In-memory slot storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<Slot, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot, as if a previous session had written it.
    #[must_use]
    pub fn with(mut self, slot: Slot, value: impl Into<String>) -> Self {
        self.slots.insert(slot, value.into());
        self
    }

    /// Raw value of a slot.
    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError> {
        self.slots.insert(slot, value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys() {
        let keys: Vec<_> = Slot::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["cart", "wishlist", "recentSearches"]);
    }

    #[test]
    fn memory_storage_reads_back_writes() {
        let mut storage = MemoryStorage::new();
        assert!(storage.read(Slot::Cart).unwrap().is_none());
        storage.write(Slot::Cart, "[]").unwrap();
        assert_eq!(storage.read(Slot::Cart).unwrap().as_deref(), Some("[]"));
        assert!(storage.read(Slot::Wishlist).unwrap().is_none());
    }
}
