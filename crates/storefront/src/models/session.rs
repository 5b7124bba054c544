//! Session-backed slot storage.
//!
//! The cart, wishlist and recent searches live in the visitor's session under
//! the same keys the store uses for its slots. A [`SessionSlots`] buffers them
//! for the duration of one request so the synchronous store can read and
//! write without touching the async session API.

use std::collections::HashMap;

use celestial_gems_core::{Slot, SlotStorage, StorageError};
use tower_sessions::Session;

/// Session keys outside the store slots.
pub mod keys {
    /// Stable per-visitor key used to debounce typeahead requests.
    pub const VISITOR_ID: &str = "visitor_id";

    /// Reference and total of the last order placed in this session.
    pub const LAST_ORDER: &str = "last_order";
}

/// Buffered copy of the session's slot values.
#[derive(Debug, Default)]
pub struct SessionSlots {
    values: HashMap<Slot, String>,
    dirty: Vec<Slot>,
}

impl SessionSlots {
    /// Read every slot from the session.
    ///
    /// A slot that cannot be read is treated as empty; the store then starts
    /// that slot from scratch.
    pub async fn load(session: &Session) -> Self {
        let mut values = HashMap::new();
        for slot in Slot::ALL {
            match session.get::<String>(slot.key()).await {
                Ok(Some(value)) => {
                    values.insert(slot, value);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(%slot, error = %err, "Failed to read slot from session");
                }
            }
        }
        Self {
            values,
            dirty: Vec::new(),
        }
    }

    /// Whether any slot was written since the last flush.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write changed slots back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the update.
    pub async fn flush(&mut self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for slot in std::mem::take(&mut self.dirty) {
            if let Some(value) = self.values.get(&slot) {
                session.insert(slot.key(), value).await?;
            }
        }
        Ok(())
    }
}

impl SlotStorage for SessionSlots {
    fn read(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(&slot).cloned())
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError> {
        self.values.insert(slot, value.to_owned());
        if !self.dirty.contains(&slot) {
            self.dirty.push(slot);
        }
        Ok(())
    }
}
