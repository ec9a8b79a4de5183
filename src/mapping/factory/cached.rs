//! mapping::factory::cached
//!
//! Caching decorator for metadata factories.
//!
//! # Behaviour
//!
//! A hit returns the stored record without touching the inner factory. A
//! miss builds through the inner factory, stores the result under
//! [`cache_key`], and returns it.
//!
//! # Concurrency
//!
//! There is no lock around read-check-build-write. Two threads (or
//! processes) missing on the same key may both build and both write; the
//! last write wins. Builds are deterministic, so the race costs duplicated
//! work and never yields a wrong record.
//!
//! Key normalisation is lossy (`a::B` and `a__B` share a key), so a hit
//! only counts when the stored record names the requested class. Anything
//! else is rebuilt and overwrites the entry.
//!
//! # Store failures
//!
//! A failing store read is treated as a miss and a failing write is
//! dropped, both logged at `warn`. The lookup still returns the built
//! record.

use std::sync::Arc;

use tracing::{debug, warn};

use super::ClassMetadataFactory;
use crate::cache::{cache_key, CacheStore};
use crate::mapping::{ClassMetadata, MappingError};

/// Factory decorator backed by a [`CacheStore`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use metamap::cache::{CacheStore, MemoryCacheStore};
/// use metamap::mapping::{
///     CachedMetadataFactory, ClassMetadataFactory, MetadataFactory, ReflectionLoader,
///     TypeDescriptor, TypeRegistry,
/// };
///
/// let mut registry = TypeRegistry::new();
/// registry.insert(TypeDescriptor::new("acme::Model").field("foo"));
/// let inner = MetadataFactory::with_loader(Arc::new(ReflectionLoader::new(Arc::new(registry))));
///
/// let store = Arc::new(MemoryCacheStore::new());
/// let factory = CachedMetadataFactory::new(Arc::new(inner), store.clone());
///
/// factory.class_metadata("acme::Model").unwrap();
/// assert!(store.has("acme__Model").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CachedMetadataFactory {
    inner: Arc<dyn ClassMetadataFactory>,
    store: Arc<dyn CacheStore>,
    prefix: Option<String>,
}

impl CachedMetadataFactory {
    pub fn new(inner: Arc<dyn ClassMetadataFactory>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            inner,
            store,
            prefix: None,
        }
    }

    /// Namespace every key as `<prefix>.<class>`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The store key used for `class`.
    pub fn key_for(&self, class: &str) -> String {
        cache_key(self.prefix.as_deref(), class)
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn inner(&self) -> &Arc<dyn ClassMetadataFactory> {
        &self.inner
    }
}

impl ClassMetadataFactory for CachedMetadataFactory {
    fn class_metadata(&self, class: &str) -> Result<Arc<ClassMetadata>, MappingError> {
        let key = self.key_for(class);

        match self.store.get(&key) {
            Ok(Some(metadata)) if metadata.name() == class => {
                debug!(class, key = %key, "class metadata cache hit");
                return Ok(metadata);
            }
            Ok(Some(other)) => debug!(
                class,
                key = %key,
                stored = other.name(),
                "cache entry belongs to another class, rebuilding"
            ),
            Ok(None) => debug!(class, key = %key, "class metadata cache miss"),
            Err(e) => warn!(class, key = %key, error = %e, "cache read failed, rebuilding"),
        }

        let metadata = self.inner.class_metadata(class)?;

        if let Err(e) = self.store.set(&key, Arc::clone(&metadata)) {
            warn!(class, key = %key, error = %e, "cache write failed");
        }

        Ok(metadata)
    }
}
