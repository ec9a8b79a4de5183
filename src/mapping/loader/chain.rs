//! mapping::loader::chain
//!
//! Composite loader merging several sources with fixed precedence.
//!
//! # Merge Policy
//!
//! Children are consulted in registration order. The first record found
//! becomes the base; each later record is folded in with
//! [`ClassMetadata::merge`], which only fills fields the base left unset.
//! Earlier loaders therefore win field by field, and later loaders (usually
//! reflection or auto-discovery) fill gaps.
//!
//! Each class's fold is independent of every other, so concurrent lookups
//! for different classes share nothing mutable.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use super::{ClassMetadataLoader, LoaderKind};
use crate::mapping::{ClassMetadata, MappingError};

/// Ordered list of loaders answering as one.
#[derive(Debug, Clone, Default)]
pub struct ChainLoader {
    loaders: Vec<Arc<dyn ClassMetadataLoader>>,
}

impl ChainLoader {
    pub fn new(loaders: Vec<Arc<dyn ClassMetadataLoader>>) -> Self {
        Self { loaders }
    }

    /// Append a loader with lower precedence than every existing one.
    pub fn push(&mut self, loader: Arc<dyn ClassMetadataLoader>) {
        self.loaders.push(loader);
    }

    pub fn loaders(&self) -> &[Arc<dyn ClassMetadataLoader>] {
        &self.loaders
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl ClassMetadataLoader for ChainLoader {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        self.loaders.iter().try_fold(None::<ClassMetadata>, |merged, loader| {
            let next: Option<ClassMetadata> = loader.load(class)?;
            Ok::<_, MappingError>(match (merged, next) {
                (None, next) => next,
                (Some(mut base), Some(next)) => {
                    base.merge(&next);
                    Some(base)
                }
                (base, None) => base,
            })
        })
    }

    fn is_enumerable(&self) -> bool {
        self.loaders.iter().any(|l| l.is_enumerable())
    }

    /// Union of the enumerable children's classes, first occurrence kept.
    ///
    /// A child that fails to enumerate is logged and skipped. The chain only
    /// fails when every enumerable child failed.
    fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        let mut seen = HashSet::new();
        let mut classes = Vec::new();
        let mut answered = false;
        let mut first_error = None;

        for loader in self.loaders.iter().filter(|l| l.is_enumerable()) {
            match loader.known_classes() {
                Ok(known) => {
                    answered = true;
                    for class in known {
                        if seen.insert(class.clone()) {
                            classes.push(class);
                        }
                    }
                }
                Err(e) => {
                    warn!(loader = %loader.kind(), error = %e, "skipping loader that cannot enumerate");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !answered => Err(e),
            _ => Ok(classes),
        }
    }

    fn kind(&self) -> LoaderKind {
        LoaderKind::Chain
    }
}
