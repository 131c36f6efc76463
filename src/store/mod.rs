//! Key-value persistence.
//!
//! The controller saves the serialized forest through a [`PersistenceStore`]
//! after every committed change. Two stores are provided: an in-memory one
//! and one backed by a JSON file on disk.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;

/// Capabilities the controller needs from a key-value store.
///
pub trait PersistenceStore {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Return the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
}

/// Refuse keys a store cannot address.
///
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey);
    }
    Ok(())
}
