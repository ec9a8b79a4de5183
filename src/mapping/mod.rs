//! mapping
//!
//! Class metadata resolution: records, loaders and factories.
//!
//! # Modules
//!
//! - [`metadata`] - `ClassMetadata` / `PropertyMetadata` records
//! - [`loader`] - Metadata sources (type registry, mapping documents, chain)
//! - [`factory`] - Lookup API and the caching decorator
//!
//! # Data Flow
//!
//! ```text
//! caller -> CachedMetadataFactory -> cache hit
//!                                 -> MetadataFactory -> ChainLoader -> loaders
//! ```
//!
//! # Errors
//!
//! A loader with no data for a class returns `Ok(None)`; that never crosses
//! the chain boundary. [`MappingError`] is reserved for configuration
//! problems (no loaders, missing paths, malformed documents) and for
//! factories that fail to build a record.

pub mod factory;
pub mod loader;
pub mod metadata;

use std::path::PathBuf;

use thiserror::Error;

pub use factory::{CachedMetadataFactory, ClassMetadataFactory, MetadataFactory};
pub use loader::{
    AnnotationLoader, ChainLoader, ClassMetadataLoader, DirectoryLoader, FileLoader, LoaderKind,
    Mapped, ReflectionLoader, TypeDescriptor, TypeRegistry,
};
pub use metadata::{ClassMetadata, PropertyMetadata, XmlStyle};

/// Errors from metadata resolution.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The factory has no loader at all.
    #[error(
        "You must define at least one class metadata loader by enabling the reflection or \
         annotation loader, or by configuring a mapping path."
    )]
    NoLoaders,

    /// Strict mode: loaders exist but none knows the class.
    #[error("no class metadata loader answered for class '{class}'")]
    Unresolved { class: String },

    /// A configured mapping path does not exist.
    #[error("The path \"{}\" does not exist.", path.display())]
    PathNotFound { path: PathBuf },

    #[error("failed to read mapping '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse mapping '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// Two mapping documents declare the same class.
    #[error("class '{class}' is mapped twice: '{first}' and '{second}'")]
    DuplicateMapping {
        class: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A factory failed to build metadata for a class.
    #[error("failed to build metadata for class '{class}': {message}")]
    Build { class: String, message: String },
}

impl MappingError {
    /// Whether this error means the deployment cannot serve classes at all.
    ///
    /// Configuration errors must abort initialization.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, MappingError::Build { .. })
    }
}
