//! service
//!
//! The assembled metadata stack handed to hosts.
//!
//! A [`MetadataService`] bundles the loader chain, the public factory (cached
//! unless caching is disabled), and, when cached, the store and warmer. It
//! is built by [`Config::build`](crate::config::Config::build) and shared
//! read-only across threads.

use std::path::Path;
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::mapping::{
    ChainLoader, ClassMetadata, ClassMetadataFactory, ClassMetadataLoader, MappingError,
};
use crate::warmer::{CacheWarmer, WarmUpReport};

#[derive(Debug, Clone)]
pub struct MetadataService {
    loader: Arc<ChainLoader>,
    factory: Arc<dyn ClassMetadataFactory>,
    store: Option<Arc<dyn CacheStore>>,
    warmer: Option<CacheWarmer>,
}

impl MetadataService {
    /// Uncached service.
    pub fn new(loader: Arc<ChainLoader>, factory: Arc<dyn ClassMetadataFactory>) -> Self {
        Self {
            loader,
            factory,
            store: None,
            warmer: None,
        }
    }

    /// Attach the cache store behind `factory` and its warmer.
    pub fn with_cache(mut self, store: Arc<dyn CacheStore>, warmer: CacheWarmer) -> Self {
        self.store = Some(store);
        self.warmer = Some(warmer);
        self
    }

    /// Resolve metadata through the public factory.
    pub fn class_metadata(&self, class: &str) -> Result<Arc<ClassMetadata>, MappingError> {
        self.factory.class_metadata(class)
    }

    /// Classes the enumerable loaders know about.
    pub fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        self.loader.known_classes()
    }

    /// Warm the cache; `None` when caching is disabled.
    pub fn warm_up(&self, target_dir: &Path) -> Option<WarmUpReport> {
        self.warmer.as_ref().map(|w| w.warm_up(target_dir))
    }

    pub fn is_cached(&self) -> bool {
        self.store.is_some()
    }

    pub fn loader(&self) -> &Arc<ChainLoader> {
        &self.loader
    }

    pub fn factory(&self) -> &Arc<dyn ClassMetadataFactory> {
        &self.factory
    }

    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }

    pub fn warmer(&self) -> Option<&CacheWarmer> {
        self.warmer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::mapping::{
        CachedMetadataFactory, Mapped, MetadataFactory, PropertyMetadata, ReflectionLoader,
        TypeDescriptor, TypeRegistry,
    };

    struct Model;

    impl Mapped for Model {
        fn type_path() -> &'static str {
            "acme::Model"
        }

        fn type_descriptor() -> TypeDescriptor {
            TypeDescriptor::new(Self::type_path()).field("id")
        }
    }

    fn chain() -> Arc<ChainLoader> {
        let mut registry = TypeRegistry::new();
        registry.register::<Model>();

        let mut chain = ChainLoader::default();
        chain.push(Arc::new(ReflectionLoader::new(Arc::new(registry))));
        Arc::new(chain)
    }

    #[test]
    fn uncached_service() {
        let loader = chain();
        let factory = Arc::new(MetadataFactory::new(loader.as_ref().clone()));
        let service = MetadataService::new(loader, factory);

        let metadata = service.class_metadata("acme::Model").expect("metadata");
        assert_eq!(metadata.property("id"), Some(&PropertyMetadata::new("id")));
        assert!(!service.is_cached());
        assert!(service.warm_up(Path::new("/tmp")).is_none());
    }

    #[test]
    fn cached_service_populates_store() {
        let loader = chain();
        let store = Arc::new(MemoryCacheStore::new());
        let factory: Arc<dyn ClassMetadataFactory> = Arc::new(CachedMetadataFactory::new(
            Arc::new(MetadataFactory::new(loader.as_ref().clone())),
            store.clone(),
        ));
        let warmer = CacheWarmer::new(factory.clone(), loader.clone());
        let service = MetadataService::new(loader, factory).with_cache(store.clone(), warmer);

        service.class_metadata("acme::Model").expect("metadata");

        assert!(service.is_cached());
        assert_eq!(store.keys(), vec!["acme__Model"]);

        // Reflection cannot enumerate, so warm-up has nothing to do.
        let report = service.warm_up(Path::new("/tmp")).expect("report");
        assert!(!report.enumerable);
        assert!(service.known_classes().expect("classes").is_empty());
    }
}
