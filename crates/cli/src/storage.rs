//! File-backed slot storage.
//!
//! Each slot is one JSON file in the state directory (`cart.json`,
//! `wishlist.json`, `recentSearches.json`). Writes go to a temporary file
//! first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use celestial_gems_core::{Slot, SlotStorage, StorageError};

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".celestial-gems";

/// Slot storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.key()))
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, slot: Slot) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(slot)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, slot: Slot, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
