//! warmer
//!
//! Ahead-of-time cache population.
//!
//! # Design
//!
//! The warmer asks the configured loader for the classes it can enumerate
//! and resolves each one through the caching factory once, discarding the
//! result. Non-enumerable loaders (reflection, annotations) are skipped;
//! inside a [`ChainLoader`] only the enumerable children contribute
//! classes, so partial warming is the normal case.
//!
//! Each class is warmed independently on the rayon pool. Order between
//! classes is not guaranteed.
//!
//! # Failure Policy
//!
//! The warmer is optional: nothing it encounters is returned as an error.
//! Enumeration failures and per-class build failures are logged and
//! recorded in the [`WarmUpReport`]; the remaining classes are still warmed.
//! A failed warm-up only costs first-request latency.
//!
//! [`ChainLoader`]: crate::mapping::ChainLoader

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::mapping::{ClassMetadataFactory, ClassMetadataLoader};

/// Outcome of one warm-up run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarmUpReport {
    /// Whether the loader could enumerate any classes at all.
    pub enumerable: bool,
    /// Classes resolved and written to the cache, sorted.
    pub warmed: Vec<String>,
    /// Classes that failed to resolve, with the error message, sorted.
    pub failed: Vec<(String, String)>,
    /// Enumeration failure, if the class list could not be obtained.
    pub enumeration_error: Option<String>,
}

impl WarmUpReport {
    /// True when every enumerated class was warmed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.enumeration_error.is_none()
    }
}

/// Pre-populates the metadata cache for every enumerable class.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use metamap::cache::MemoryCacheStore;
/// use metamap::mapping::{CachedMetadataFactory, DirectoryLoader, MetadataFactory};
/// use metamap::warmer::CacheWarmer;
///
/// let loader = Arc::new(DirectoryLoader::new("config/serializer").unwrap());
/// let factory = CachedMetadataFactory::new(
///     Arc::new(MetadataFactory::with_loader(loader.clone())),
///     Arc::new(MemoryCacheStore::new()),
/// );
///
/// let warmer = CacheWarmer::new(Arc::new(factory), loader);
/// let report = warmer.warm_up(Path::new("target/cache"));
/// println!("warmed {} classes", report.warmed.len());
/// ```
#[derive(Debug, Clone)]
pub struct CacheWarmer {
    factory: Arc<dyn ClassMetadataFactory>,
    loader: Arc<dyn ClassMetadataLoader>,
}

impl CacheWarmer {
    /// `factory` should be the caching factory; `loader` the one it uses.
    pub fn new(
        factory: Arc<dyn ClassMetadataFactory>,
        loader: Arc<dyn ClassMetadataLoader>,
    ) -> Self {
        Self { factory, loader }
    }

    /// Warm-up failures never prevent startup.
    pub fn is_optional(&self) -> bool {
        true
    }

    /// Resolve every enumerable class once.
    ///
    /// Idempotent: re-running rewrites equivalent entries. `target_dir` is
    /// the host's cache directory for this run; entries themselves go to
    /// the factory's cache store.
    pub fn warm_up(&self, target_dir: &Path) -> WarmUpReport {
        let mut report = WarmUpReport::default();

        if !self.loader.is_enumerable() {
            debug!(loader = %self.loader.kind(), "loader cannot enumerate classes, skipping warm-up");
            return report;
        }
        report.enumerable = true;

        let classes = match self.loader.known_classes() {
            Ok(classes) => classes,
            Err(e) => {
                warn!(error = %e, "cannot enumerate classes for warm-up");
                report.enumeration_error = Some(e.to_string());
                return report;
            }
        };

        let results: Vec<(String, Result<(), String>)> = classes
            .into_par_iter()
            .map(|class| {
                let outcome = self
                    .factory
                    .class_metadata(&class)
                    .map(|_| ())
                    .map_err(|e| e.to_string());
                (class, outcome)
            })
            .collect();

        for (class, outcome) in results {
            match outcome {
                Ok(()) => report.warmed.push(class),
                Err(message) => {
                    warn!(class = %class, error = %message, "failed to warm class metadata");
                    report.failed.push((class, message));
                }
            }
        }

        report.warmed.sort();
        report.failed.sort();

        info!(
            target_dir = %target_dir.display(),
            warmed = report.warmed.len(),
            failed = report.failed.len(),
            "class metadata cache warmed"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryCacheStore};
    use crate::mapping::{
        CachedMetadataFactory, ChainLoader, ClassMetadata, LoaderKind, MappingError,
        MetadataFactory,
    };

    /// Enumerable loader with a fixed class list.
    #[derive(Debug)]
    struct Listed(Vec<&'static str>);

    impl ClassMetadataLoader for Listed {
        fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
            Ok(self.0.contains(&class).then(|| ClassMetadata::new(class)))
        }

        fn is_enumerable(&self) -> bool {
            true
        }

        fn known_classes(&self) -> Result<Vec<String>, MappingError> {
            Ok(self.0.iter().map(|c| c.to_string()).collect())
        }
    }

    /// Enumerable loader whose enumeration fails.
    #[derive(Debug)]
    struct Unlistable;

    impl ClassMetadataLoader for Unlistable {
        fn load(&self, _class: &str) -> Result<Option<ClassMetadata>, MappingError> {
            Ok(None)
        }

        fn is_enumerable(&self) -> bool {
            true
        }

        fn known_classes(&self) -> Result<Vec<String>, MappingError> {
            Err(MappingError::Build {
                class: "*".into(),
                message: "index unavailable".into(),
            })
        }

        fn kind(&self) -> LoaderKind {
            LoaderKind::Directory
        }
    }

    /// Enumerable loader that fails to build one of its classes.
    #[derive(Debug)]
    struct Flaky {
        classes: Vec<&'static str>,
        broken: &'static str,
    }

    impl ClassMetadataLoader for Flaky {
        fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
            if class == self.broken {
                return Err(MappingError::Build {
                    class: class.into(),
                    message: "corrupt mapping".into(),
                });
            }
            Ok(self.classes.contains(&class).then(|| ClassMetadata::new(class)))
        }

        fn is_enumerable(&self) -> bool {
            true
        }

        fn known_classes(&self) -> Result<Vec<String>, MappingError> {
            Ok(self.classes.iter().map(|c| c.to_string()).collect())
        }
    }

    fn warmer(loader: Arc<dyn ClassMetadataLoader>) -> (CacheWarmer, Arc<MemoryCacheStore>) {
        let store = Arc::new(MemoryCacheStore::new());
        let factory = CachedMetadataFactory::new(
            Arc::new(MetadataFactory::with_loader(loader.clone())),
            store.clone(),
        );
        (CacheWarmer::new(Arc::new(factory), loader), store)
    }

    #[test]
    fn warms_every_enumerated_class() {
        let (warmer, store) = warmer(Arc::new(Listed(vec!["acme::B", "acme::A"])));
        let report = warmer.warm_up(Path::new("/tmp"));

        assert!(report.enumerable);
        assert!(report.is_complete());
        assert_eq!(report.warmed, vec!["acme::A", "acme::B"]);
        assert!(store.has("acme__A").expect("has"));
        assert!(store.has("acme__B").expect("has"));
    }

    #[test]
    fn warm_up_is_idempotent() {
        let (warmer, store) = warmer(Arc::new(Listed(vec!["acme::A"])));

        let first = warmer.warm_up(Path::new("/tmp"));
        let second = warmer.warm_up(Path::new("/tmp"));

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn enumeration_failure_is_reported_not_raised() {
        let (warmer, store) = warmer(Arc::new(Unlistable));
        let report = warmer.warm_up(Path::new("/tmp"));

        assert!(report.enumerable);
        assert!(!report.is_complete());
        assert!(report
            .enumeration_error
            .as_deref()
            .is_some_and(|e| e.contains("index unavailable")));
        assert!(store.is_empty());
    }

    #[test]
    fn is_optional() {
        let (warmer, _store) = warmer(Arc::new(Listed(vec![])));
        assert!(warmer.is_optional());
    }

    #[test]
    fn one_failing_class_does_not_stop_the_rest() {
        let (warmer, store) = warmer(Arc::new(Flaky {
            classes: vec!["acme::A", "acme::Bad", "acme::C"],
            broken: "acme::Bad",
        }));
        let report = warmer.warm_up(Path::new("/tmp"));

        assert!(!report.is_complete());
        assert!(report.enumeration_error.is_none());
        assert_eq!(report.warmed, vec!["acme::A", "acme::C"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "acme::Bad");
        assert!(report.failed[0].1.contains("corrupt mapping"));

        assert!(store.has("acme__A").expect("has"));
        assert!(store.has("acme__C").expect("has"));
        assert!(!store.has("acme__Bad").expect("has"));
    }

    #[test]
    fn unlistable_chain_member_still_warms_the_others() {
        let loaders: Vec<Arc<dyn ClassMetadataLoader>> =
            vec![Arc::new(Listed(vec!["acme::A"])), Arc::new(Unlistable)];
        let chain = ChainLoader::new(loaders);
        let (warmer, store) = warmer(Arc::new(chain));
        let report = warmer.warm_up(Path::new("/tmp"));

        assert!(report.enumeration_error.is_none());
        assert_eq!(report.warmed, vec!["acme::A"]);
        assert!(store.has("acme__A").expect("has"));
    }
}
