use super::{check_key, PersistenceStore, StoreError};
use serde_json::Value;
use std::collections::HashMap;

/// Store keeping values in memory only.
///
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Number of successful writes so far.
    ///
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PersistenceStore for MemoryStore {
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        check_key(key)?;
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        check_key(key)?;
        Ok(self.values.get(key).cloned())
    }
}
