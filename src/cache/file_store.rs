//! cache::file_store
//!
//! File-based cache store.
//!
//! # Layout
//!
//! Each entry is a JSON file `<dir>/<key>.json` holding a self-describing
//! envelope (`kind`, `schema_version`, `cached_at`) around the metadata.
//! Keys are validated against the store key space before touching the
//! filesystem, so a key can never escape the cache directory.
//!
//! # Writes
//!
//! Writes are atomic: content goes to a uniquely named temp file that is
//! then renamed over the entry. Two processes racing on one key both
//! produce a complete file; the last rename wins.
//!
//! # Expiry
//!
//! With a TTL, entries older than the TTL read as misses and are replaced
//! on the next write. Corrupt or foreign entries also read as misses.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::traits::{validate_key, CacheError, CacheStore};
use crate::mapping::ClassMetadata;

/// Kind identifier written into every entry.
pub const ENTRY_KIND: &str = "metamap.class-metadata";

/// Current entry schema version.
pub const ENTRY_SCHEMA_VERSION: u32 = 1;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    kind: String,
    schema_version: u32,
    cached_at: DateTime<Utc>,
    metadata: ClassMetadata,
}

impl CacheEntry {
    fn is_current(&self) -> bool {
        self.kind == ENTRY_KIND && self.schema_version == ENTRY_SCHEMA_VERSION
    }
}

/// Cache store persisting one JSON file per entry.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl FileCacheStore {
    /// Store rooted at `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: None,
        }
    }

    /// Store at the platform cache directory (`<cache_dir>/metamap`).
    ///
    /// Returns `None` if the platform has no cache directory.
    pub fn in_default_location() -> Option<Self> {
        dirs::cache_dir().map(|dir| Self::new(dir.join("metamap")))
    }

    /// Expire entries older than `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now() - entry.cached_at > ttl,
            None => false,
        }
    }

    fn write_entry(&self, key: &str, content: &str) -> Result<(), CacheError> {
        let write_error = |message: String| CacheError::Write {
            key: key.to_string(),
            message,
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| write_error(format!("cannot create directory: {}", e)))?;

        let temp_path = self.dir.join(format!(
            "{}.{}.{}.tmp",
            key,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| write_error(format!("cannot create temp file: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| write_error(format!("cannot write entry: {}", e)))?;

            file.sync_all()
                .map_err(|e| write_error(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, self.entry_path(key)).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            write_error(format!("cannot rename temp file: {}", e))
        })
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Result<Option<Arc<ClassMetadata>>, CacheError> {
        validate_key(key)?;

        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| CacheError::Read {
            key: key.to_string(),
            message: format!("cannot read cache file: {}", e),
        })?;

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cache entry");
                return Ok(None);
            }
        };

        if !entry.is_current() || self.is_expired(&entry) {
            return Ok(None);
        }

        Ok(Some(Arc::new(entry.metadata)))
    }

    fn set(&self, key: &str, metadata: Arc<ClassMetadata>) -> Result<(), CacheError> {
        validate_key(key)?;

        let entry = CacheEntry {
            kind: ENTRY_KIND.to_string(),
            schema_version: ENTRY_SCHEMA_VERSION,
            cached_at: Utc::now(),
            metadata: (*metadata).clone(),
        };

        let content = serde_json::to_string_pretty(&entry).map_err(|e| CacheError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        self.write_entry(key, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::PropertyMetadata;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileCacheStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileCacheStore::new(temp.path().join("cache"));
        (temp, store)
    }

    fn sample() -> Arc<ClassMetadata> {
        Arc::new(
            ClassMetadata::new("acme::Model")
                .with_xml_root("model")
                .with_property(PropertyMetadata::new("foo").with_alias("bar")),
        )
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();
        assert!(store.get("missing").expect("get").is_none());
        assert!(!store.has("missing").expect("has"));
    }

    #[test]
    fn set_and_get() {
        let (_temp, store) = create_test_store();
        store.set("acme__Model", sample()).expect("set");

        let cached = store.get("acme__Model").expect("get").expect("hit");
        assert_eq!(*cached, *sample());
        assert!(store.has("acme__Model").expect("has"));
    }

    #[test]
    fn creates_directory_if_missing() {
        let (_temp, store) = create_test_store();
        assert!(!store.dir().exists());

        store.set("k", sample()).expect("set");

        assert!(store.dir().join("k.json").exists());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (_temp, store) = create_test_store();
        store.set("k", sample()).expect("set");
        store.set("k", sample()).expect("set again");

        let names: Vec<_> = fs::read_dir(store.dir())
            .expect("read dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("k.json")]);
    }

    #[test]
    fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");

        FileCacheStore::new(temp.path())
            .set("k", sample())
            .expect("set");

        let reopened = FileCacheStore::new(temp.path());
        assert!(reopened.get("k").expect("get").is_some());
    }

    #[test]
    fn expired_entries_are_misses() {
        let (_temp, store) = create_test_store();
        store.set("k", sample()).expect("set");

        let expired = store.clone().with_ttl(Duration::seconds(-1));
        assert!(expired.get("k").expect("get").is_none());

        let fresh = store.with_ttl(Duration::hours(1));
        assert!(fresh.get("k").expect("get").is_some());
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let (_temp, store) = create_test_store();
        fs::create_dir_all(store.dir()).expect("mkdir");
        fs::write(store.dir().join("k.json"), "{ not json").expect("write");

        assert!(store.get("k").expect("get").is_none());
    }

    #[test]
    fn foreign_kind_is_a_miss() {
        let (_temp, store) = create_test_store();
        fs::create_dir_all(store.dir()).expect("mkdir");
        let foreign = serde_json::json!({
            "kind": "something.else",
            "schema_version": 1,
            "cached_at": "2024-01-01T00:00:00Z",
            "metadata": { "name": "M" }
        });
        fs::write(store.dir().join("k.json"), foreign.to_string()).expect("write");

        assert!(store.get("k").expect("get").is_none());
    }

    #[test]
    fn keys_cannot_escape_directory() {
        let (_temp, store) = create_test_store();
        let err = store.set("../escape", sample()).unwrap_err();
        assert!(matches!(err, CacheError::InvalidKey(_)));
    }
}
