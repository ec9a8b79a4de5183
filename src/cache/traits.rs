//! cache::traits
//!
//! Cache store trait and key normalisation.
//!
//! # Keys
//!
//! Store keys are restricted to `[A-Za-z0-9_.]`. [`cache_key`] maps a class
//! name into that space by replacing every other character with `_`, so
//! `acme::model::Model` becomes `acme__model__Model`. The caching factory
//! and the warmer both go through this one function, which keeps the write
//! and warm-up paths on the same key.
//!
//! # Expiry
//!
//! Stores own eviction and expiry. Callers never evict explicitly.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::mapping::ClassMetadata;

/// Errors from cache store operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache entry '{key}': {message}")]
    Read { key: String, message: String },

    #[error("failed to write cache entry '{key}': {message}")]
    Write { key: String, message: String },

    #[error("failed to serialize cache entry '{key}': {message}")]
    Serialize { key: String, message: String },

    /// Key contains characters outside the store's key space.
    #[error("invalid cache key '{0}'")]
    InvalidKey(String),
}

/// Durable storage for resolved class metadata.
///
/// Implementations must be thread-safe. Concurrent `set` calls for the same
/// key may race; the last write wins.
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Get the record stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> Result<Option<Arc<ClassMetadata>>, CacheError>;

    /// Store a record, replacing any existing entry.
    fn set(&self, key: &str, metadata: Arc<ClassMetadata>) -> Result<(), CacheError>;

    /// Check whether a live entry exists.
    ///
    /// Default implementation uses `get()` and checks for `Some`.
    fn has(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Whether a character is legal in a store key.
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Reject keys outside the store key space.
pub fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() || !key.chars().all(is_key_char) {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Build the store key for a class.
///
/// With a prefix the key is `<prefix>.<normalised class>`.
///
/// # Example
///
/// ```
/// use metamap::cache::cache_key;
///
/// assert_eq!(cache_key(None, "acme::model::Model"), "acme__model__Model");
/// assert_eq!(cache_key(Some("metamap"), "acme::Model"), "metamap.acme__Model");
/// ```
pub fn cache_key(prefix: Option<&str>, class: &str) -> String {
    let normalised: String = class
        .chars()
        .map(|c| if is_key_char(c) { c } else { '_' })
        .collect();

    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}.{}", prefix, normalised),
        None => normalised,
    }
}
