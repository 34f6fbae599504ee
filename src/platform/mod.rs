//! Platform abstraction layer
//!
//! Handles browser/native differences for storage. The store only ever sees
//! the `StorageBackend` trait; LocalStorage backs it on the web and an
//! in-memory map backs it natively and in tests.

pub mod storage;

use std::collections::HashMap;

use crate::store::StoreError;

/// String key-value storage, shaped after the browser `Storage` API
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile backend used natively and by tests
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    items: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.get_item("k").unwrap(), None);

        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("v"));

        // Last write wins
        backend.set_item("k", "w").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("w"));
    }
}
