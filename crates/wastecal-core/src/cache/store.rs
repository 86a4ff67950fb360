//! Persistent string slots, one per resource kind.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

/// A string-keyed store that survives restarts.
///
/// Writes replace a slot in full. Read failures of any kind surface as an
/// absent slot.
pub trait SlotStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> io::Result<()>;

    /// Drop a slot outright. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// One `<key>.json` file per slot inside a cache directory.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    cache_dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(slot = key, error = %e, "Failed to read cache slot");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        // One temp file per write, renamed over the slot; deleted on drop if
        // anything fails
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", key))
            .suffix(".json.tmp")
            .tempfile_in(&self.cache_dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.slot_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.slot_path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Slots held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Option<String> {
        self.slots().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.slots().remove(key);
        Ok(())
    }
}
