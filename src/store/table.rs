//! Table implementation
//!
//! HashMap-based table guarded by a single Mutex.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::Mutex;

/// In-memory key-value table shared by every session
///
/// All operations take `&self` and hold the same lock for their entire
/// duration, so operations from different connections are serialized.
#[derive(Debug, Default)]
pub struct Table {
    entries: Mutex<HashMap<Bytes, Bytes>>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `key`
    pub fn set(&self, key: Bytes, value: Bytes) {
        self.entries.lock().insert(key, value);
    }

    /// Get the current value for `key`, if any
    ///
    /// `Bytes` clones share the underlying buffer, so the lock is held
    /// only for the lookup itself.
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.entries.lock().get(key).cloned()
    }

    /// Remove `key`, returning whether an entry was removed
    pub fn delete(&self, key: &[u8]) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Whether `key` currently has an entry
    pub fn exists(&self, key: &[u8]) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
