//! cache
//!
//! Cache stores for resolved class metadata.
//!
//! # Architecture
//!
//! Stores implement the [`CacheStore`] trait (`has` / `get` / `set`):
//!
//! - [`MemoryCacheStore`]: process-local map, no expiry
//! - [`FileCacheStore`]: one JSON file per entry, optional TTL
//!
//! Stores own expiry. The caching factory and the warmer never evict; they
//! only read and write through keys built by [`cache_key`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use metamap::cache::{cache_key, CacheStore, MemoryCacheStore};
//! use metamap::mapping::ClassMetadata;
//!
//! let store = MemoryCacheStore::new();
//! let key = cache_key(None, "acme::Model");
//!
//! store.set(&key, Arc::new(ClassMetadata::new("acme::Model"))).unwrap();
//! assert!(store.has(&key).unwrap());
//! ```

mod file_store;
mod memory_store;
mod traits;

pub use file_store::{FileCacheStore, ENTRY_KIND, ENTRY_SCHEMA_VERSION};
pub use memory_store::MemoryCacheStore;
pub use traits::{cache_key, is_key_char, validate_key, CacheError, CacheStore};
