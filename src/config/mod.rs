//! config
//!
//! Configuration loading and service assembly.
//!
//! # Locations
//!
//! Searched in order:
//! 1. The path passed explicitly (e.g. `--config`)
//! 2. `$METAMAP_CONFIG` if set
//! 3. `./serializer.toml`
//!
//! Missing config files are not an error when no path was given: defaults
//! are used, with the current directory as the base for relative paths.
//!
//! # Loader Order
//!
//! [`Config::build`] assembles loaders earliest-wins:
//! 1. explicit `mapping.paths` (files or directories, must exist)
//! 2. auto-discovered `<root>/<path>` directories (missing ones skipped)
//! 3. declared attributes, when `mapping.annotations` is on
//! 4. skeletal reflection, when `mapping.reflection` is on
//!
//! Relative paths resolve against the directory holding the config file.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use metamap::config::Config;
//! use metamap::mapping::TypeRegistry;
//!
//! let result = Config::load(Some(Path::new("serializer.toml"))).unwrap();
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning.message);
//! }
//!
//! let service = result.config.build(Arc::new(TypeRegistry::new())).unwrap();
//! let metadata = service.class_metadata("acme::model::Model").unwrap();
//! println!("{} properties", metadata.properties().len());
//! ```

pub mod schema;

pub use schema::{AutoConfig, CacheBackend, CacheConfig, MapperConfig, MappingConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheError, CacheStore, FileCacheStore, MemoryCacheStore};
use crate::mapping::{
    AnnotationLoader, CachedMetadataFactory, ChainLoader, ClassMetadataFactory,
    ClassMetadataLoader, DirectoryLoader, FileLoader, MappingError, MetadataFactory,
    ReflectionLoader, TypeRegistry,
};
use crate::service::MetadataService;
use crate::warmer::CacheWarmer;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "serializer.toml";

/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "METAMAP_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Parsed configuration plus the location it was loaded from.
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed file contents
    pub file: MapperConfig,
    /// Base for relative paths
    base_dir: PathBuf,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base(MapperConfig::default(), PathBuf::from("."))
    }
}

impl Config {
    /// Wrap an already-parsed config, resolving relative paths against `base_dir`.
    pub fn with_base(file: MapperConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            file,
            base_dir: base_dir.into(),
            path: None,
        }
    }

    /// Load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is given but cannot be read, or if any
    /// config file found cannot be parsed or fails validation.
    pub fn load(path: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let located = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::locate(),
        };

        let config = match located {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                Config::default()
            }
        };

        let warnings = config.check_auto_roots();

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Find a config file in the default locations.
    fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    }

    /// Read, parse and validate one config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: MapperConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            file,
            base_dir,
            path: Some(path.to_path_buf()),
        })
    }

    fn check_auto_roots(&self) -> Vec<ConfigWarning> {
        if !self.auto_enabled() {
            return Vec::new();
        }

        self.auto_roots()
            .into_iter()
            .filter(|root| !root.is_dir())
            .map(|root| ConfigWarning {
                message: format!(
                    "auto-discovery root '{}' does not exist, skipping",
                    root.display()
                ),
                path: root,
            })
            .collect()
    }

    /// Resolve a configured path against the config directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    // Accessors with defaults applied

    pub fn reflection_enabled(&self) -> bool {
        self.file.mapping.reflection.unwrap_or(true)
    }

    pub fn annotations_enabled(&self) -> bool {
        self.file.mapping.annotations.unwrap_or(true)
    }

    pub fn strict(&self) -> bool {
        self.file.mapping.strict.unwrap_or(false)
    }

    pub fn auto_enabled(&self) -> bool {
        self.file
            .mapping
            .auto
            .as_ref()
            .is_some_and(|auto| auto.enabled.unwrap_or(true))
    }

    pub fn cache_enabled(&self) -> bool {
        self.file.cache.enabled.unwrap_or(true)
    }

    pub fn cache_prefix(&self) -> Option<&str> {
        self.file.cache.prefix.as_deref()
    }

    pub fn cache_backend(&self) -> CacheBackend {
        self.file.cache.backend.unwrap_or_default()
    }

    /// File backend directory: configured, or `<cache_dir>/metamap`.
    pub fn cache_directory(&self) -> Option<PathBuf> {
        match &self.file.cache.directory {
            Some(dir) => Some(self.resolve(dir)),
            None => FileCacheStore::in_default_location().map(|store| store.dir().to_path_buf()),
        }
    }

    /// Explicit mapping paths, resolved.
    pub fn mapping_paths(&self) -> Vec<PathBuf> {
        self.file
            .mapping
            .paths
            .iter()
            .map(|p| self.resolve(p))
            .collect()
    }

    fn auto_roots(&self) -> Vec<PathBuf> {
        self.file
            .mapping
            .auto
            .iter()
            .flat_map(|auto| auto.roots.iter())
            .map(|root| self.resolve(root))
            .collect()
    }

    /// Existing `<root>/<path>` directories, in root then path order.
    pub fn auto_directories(&self) -> Vec<PathBuf> {
        if !self.auto_enabled() {
            return Vec::new();
        }

        let sub_paths: Vec<PathBuf> = self
            .file
            .mapping
            .auto
            .as_ref()
            .and_then(|auto| auto.paths.clone())
            .unwrap_or_else(|| {
                schema::DEFAULT_AUTO_PATHS
                    .iter()
                    .map(PathBuf::from)
                    .collect()
            });

        self.auto_roots()
            .into_iter()
            .flat_map(|root| sub_paths.iter().map(move |sub| root.join(sub)))
            .filter(|dir| {
                let found = dir.is_dir();
                if !found {
                    debug!(dir = %dir.display(), "no mapping directory, skipping");
                }
                found
            })
            .collect()
    }

    /// Path the config was loaded from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Assemble the loader chain only.
    ///
    /// # Errors
    ///
    /// `MappingError::PathNotFound` for a missing explicit path, parse errors
    /// from mapping documents, and `MappingError::NoLoaders` if nothing is
    /// enabled.
    pub fn build_loader(&self, registry: Arc<TypeRegistry>) -> Result<ChainLoader, ConfigError> {
        let mut chain = ChainLoader::default();

        for path in self.mapping_paths() {
            let loader: Arc<dyn ClassMetadataLoader> = if path.is_dir() {
                Arc::new(DirectoryLoader::new(path)?)
            } else {
                Arc::new(FileLoader::new(path)?)
            };
            chain.push(loader);
        }

        for dir in self.auto_directories() {
            chain.push(Arc::new(DirectoryLoader::new(dir)?));
        }

        if self.annotations_enabled() {
            chain.push(Arc::new(AnnotationLoader::new(registry.clone())));
        }

        if self.reflection_enabled() {
            chain.push(Arc::new(ReflectionLoader::new(registry)));
        }

        if chain.is_empty() {
            return Err(MappingError::NoLoaders.into());
        }

        debug!(loaders = chain.len(), "assembled class metadata loaders");
        Ok(chain)
    }

    fn build_store(&self) -> Result<Arc<dyn CacheStore>, ConfigError> {
        match self.cache_backend() {
            CacheBackend::Memory => Ok(Arc::new(MemoryCacheStore::new())),
            CacheBackend::File => {
                let dir = self.cache_directory().ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "no platform cache directory, set cache.directory".to_string(),
                    )
                })?;

                let mut store = FileCacheStore::new(dir);
                if let Some(seconds) = self.file.cache.ttl_seconds {
                    let ttl = i64::try_from(seconds)
                        .ok()
                        .and_then(chrono::Duration::try_seconds)
                        .ok_or_else(|| {
                            ConfigError::InvalidValue(format!(
                                "cache.ttl_seconds out of range: {}",
                                seconds
                            ))
                        })?;
                    store = store.with_ttl(ttl);
                }
                Ok(Arc::new(store))
            }
        }
    }

    /// Assemble loaders, factory, cache and warmer.
    ///
    /// With `cache.enabled = false` the plain factory is exposed and no
    /// warmer is built.
    pub fn build(&self, registry: Arc<TypeRegistry>) -> Result<MetadataService, ConfigError> {
        let loader = Arc::new(self.build_loader(registry)?);
        let factory: Arc<dyn ClassMetadataFactory> =
            Arc::new(MetadataFactory::new(loader.as_ref().clone()).strict(self.strict()));

        if !self.cache_enabled() {
            debug!("metadata cache disabled");
            return Ok(MetadataService::new(loader, factory));
        }

        let store = self.build_store()?;
        let mut cached = CachedMetadataFactory::new(factory, store.clone());
        if let Some(prefix) = self.cache_prefix() {
            cached = cached.with_prefix(prefix);
        }
        let cached: Arc<dyn ClassMetadataFactory> = Arc::new(cached);

        let warmer = CacheWarmer::new(cached.clone(), loader.clone());

        Ok(MetadataService::new(loader, cached).with_cache(store, warmer))
    }
}
