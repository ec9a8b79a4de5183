//! config::schema
//!
//! Configuration schema types.
//!
//! # Layout
//!
//! `serializer.toml` has two tables, `[mapping]` (with an optional
//! `[mapping.auto]` sub-table) and `[cache]`. Every field is optional;
//! unset fields take the defaults documented on each accessor.
//!
//! # Validation
//!
//! Config values are validated after parsing: prefixes must stay inside
//! the cache key space, TTLs must be positive and only apply to the file
//! backend, and paths must be non-empty.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::cache::is_key_char;

/// Default sub-paths probed under each auto-discovery root.
pub const DEFAULT_AUTO_PATHS: &[&str] = &["mapping"];

/// Top-level configuration file.
///
/// # Example
///
/// ```toml
/// [mapping]
/// reflection = true
/// annotations = true
/// paths = ["config/serializer"]
///
/// [mapping.auto]
/// roots = ["crates/acme"]
///
/// [cache]
/// prefix = "acme"
/// backend = "file"
/// ttl_seconds = 3600
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Loader selection
    pub mapping: MappingConfig,

    /// Metadata cache settings
    pub cache: CacheConfig,
}

impl MapperConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mapping.validate()?;
        self.cache.validate()
    }
}

/// `[mapping]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    /// Skeletal loader over registered types (default: true)
    pub reflection: Option<bool>,

    /// Declared-attribute loader over registered types (default: true)
    pub annotations: Option<bool>,

    /// Fail instead of returning empty metadata (default: false)
    pub strict: Option<bool>,

    /// Mapping files or directories, in precedence order
    pub paths: Vec<PathBuf>,

    /// Per-package mapping directory discovery
    pub auto: Option<AutoConfig>,
}

impl MappingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "mapping.paths cannot contain an empty path".to_string(),
            ));
        }

        if let Some(auto) = &self.auto {
            auto.validate()?;
        }

        Ok(())
    }
}

/// `[mapping.auto]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AutoConfig {
    /// Whether discovery runs (default: true)
    pub enabled: Option<bool>,

    /// Package roots to probe
    pub roots: Vec<PathBuf>,

    /// Relative sub-paths probed under each root (default: `["mapping"]`)
    pub paths: Option<Vec<PathBuf>>,
}

impl AutoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roots.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "mapping.auto.roots cannot contain an empty path".to_string(),
            ));
        }

        if let Some(paths) = &self.paths {
            if let Some(absolute) = paths.iter().find(|p| p.is_absolute()) {
                return Err(ConfigError::InvalidValue(format!(
                    "mapping.auto.paths must be relative, got '{}'",
                    absolute.display()
                )));
            }
        }

        Ok(())
    }
}

/// Cache store backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map, lost on exit
    #[default]
    Memory,
    /// One JSON file per entry
    File,
}

/// `[cache]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether the factory is cached (default: true)
    pub enabled: Option<bool>,

    /// Key prefix
    pub prefix: Option<String>,

    /// Store backend (default: memory)
    pub backend: Option<CacheBackend>,

    /// File backend directory
    pub directory: Option<PathBuf>,

    /// File backend expiry
    pub ttl_seconds: Option<u64>,
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.prefix {
            if prefix.is_empty() || !prefix.chars().all(is_key_char) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid cache prefix '{}', allowed characters are A-Z, a-z, 0-9, '_' and '.'",
                    prefix
                )));
            }
        }

        let backend = self.backend.unwrap_or_default();

        if let Some(ttl) = self.ttl_seconds {
            if ttl == 0 {
                return Err(ConfigError::InvalidValue(
                    "cache.ttl_seconds must be greater than zero".to_string(),
                ));
            }
            if backend != CacheBackend::File {
                return Err(ConfigError::InvalidValue(
                    "cache.ttl_seconds requires backend = \"file\"".to_string(),
                ));
            }
        }

        if self.directory.is_some() && backend != CacheBackend::File {
            return Err(ConfigError::InvalidValue(
                "cache.directory requires backend = \"file\"".to_string(),
            ));
        }

        Ok(())
    }
}
