//! mapping::factory
//!
//! Public lookup API for class metadata.
//!
//! # Design
//!
//! [`ClassMetadataFactory`] is the single lookup contract. Two
//! implementations exist:
//!
//! - [`MetadataFactory`] delegates to a [`ChainLoader`] and builds a fresh
//!   record on every call
//! - [`CachedMetadataFactory`] decorates any factory with a [`CacheStore`]
//!   so the expensive build runs once per class per cache lifetime
//!
//! Returned records are shared behind `Arc` and must be treated as
//! immutable.
//!
//! [`CacheStore`]: crate::cache::CacheStore

mod cached;

pub use cached::CachedMetadataFactory;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::loader::{ChainLoader, ClassMetadataLoader};
use super::{ClassMetadata, MappingError};

/// Resolves metadata for a class name.
pub trait ClassMetadataFactory: Send + Sync + fmt::Debug {
    /// Get the metadata for `class`.
    ///
    /// # Errors
    ///
    /// Configuration errors (no loaders, strict-mode misses) and build
    /// failures. An unknown class is not an error outside strict mode: it
    /// resolves to an empty record.
    fn class_metadata(&self, class: &str) -> Result<Arc<ClassMetadata>, MappingError>;
}

impl<F: ClassMetadataFactory + ?Sized> ClassMetadataFactory for Arc<F> {
    fn class_metadata(&self, class: &str) -> Result<Arc<ClassMetadata>, MappingError> {
        (**self).class_metadata(class)
    }
}

/// Factory resolving metadata through a loader chain.
///
/// Stateless: each call folds the chain afresh, so concurrent readers
/// share nothing mutable.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use metamap::mapping::{
///     ChainLoader, ClassMetadataFactory, MetadataFactory, ReflectionLoader, TypeDescriptor,
///     TypeRegistry,
/// };
///
/// let mut registry = TypeRegistry::new();
/// registry.insert(TypeDescriptor::new("acme::Model").field("foo"));
///
/// let loader = ReflectionLoader::new(Arc::new(registry));
/// let factory = MetadataFactory::new(ChainLoader::new(vec![Arc::new(loader)]));
///
/// let metadata = factory.class_metadata("acme::Model").unwrap();
/// assert!(metadata.has_property("foo"));
/// ```
#[derive(Debug, Clone)]
pub struct MetadataFactory {
    chain: ChainLoader,
    strict: bool,
}

impl MetadataFactory {
    pub fn new(chain: ChainLoader) -> Self {
        Self {
            chain,
            strict: false,
        }
    }

    /// Factory over a single loader.
    pub fn with_loader(loader: Arc<dyn ClassMetadataLoader>) -> Self {
        Self::new(ChainLoader::new(vec![loader]))
    }

    /// In strict mode a class no loader knows is a configuration error
    /// instead of an empty record.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn loader(&self) -> &ChainLoader {
        &self.chain
    }
}

impl ClassMetadataFactory for MetadataFactory {
    fn class_metadata(&self, class: &str) -> Result<Arc<ClassMetadata>, MappingError> {
        if self.chain.is_empty() {
            return Err(MappingError::NoLoaders);
        }

        match self.chain.load(class)? {
            Some(metadata) => Ok(Arc::new(metadata)),
            None if self.strict => Err(MappingError::Unresolved {
                class: class.to_string(),
            }),
            None => {
                debug!(class, "no loader answered, using empty metadata");
                Ok(Arc::new(ClassMetadata::new(class)))
            }
        }
    }
}
