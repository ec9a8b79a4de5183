//! cache::memory_store
//!
//! In-process cache store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{validate_key, CacheError, CacheStore};
use crate::mapping::ClassMetadata;

/// Cache store holding records in memory for the life of the process.
///
/// Entries never expire. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, Arc<ClassMetadata>>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Arc<ClassMetadata>>, CacheError> {
        validate_key(key)?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, metadata: Arc<ClassMetadata>) -> Result<(), CacheError> {
        validate_key(key)?;
        self.entries.write().insert(key.to_string(), metadata);
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.entries.read().contains_key(key))
    }
}
