//! mapping::loader
//!
//! Metadata loader trait and implementations.
//!
//! # Variants
//!
//! | Loader | Source | Enumerable |
//! |---|---|---|
//! | [`ReflectionLoader`] | registered type shapes, names only | no |
//! | [`AnnotationLoader`] | attributes declared on registered types | no |
//! | [`FileLoader`] | one mapping document | yes |
//! | [`DirectoryLoader`] | every mapping document under a root | yes |
//! | [`ChainLoader`] | ordered children, merged | if any child is |
//!
//! Enumerable loaders can list the classes they know, which is what the
//! cache warmer needs. The warmer checks [`ClassMetadataLoader::is_enumerable`]
//! rather than the concrete type.

mod chain;
mod directory;
pub mod document;
mod file;
mod reflection;
pub mod registry;

use std::fmt;

pub use chain::ChainLoader;
pub use directory::DirectoryLoader;
pub use file::FileLoader;
pub use reflection::{AnnotationLoader, ReflectionLoader};
pub use registry::{FieldDescriptor, Mapped, TypeDescriptor, TypeRegistry};

use super::{ClassMetadata, MappingError};

/// Loader variant, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderKind {
    Reflection,
    Annotation,
    File,
    Directory,
    Chain,
    /// A loader defined outside this crate.
    Custom,
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoaderKind::Reflection => "reflection",
            LoaderKind::Annotation => "annotation",
            LoaderKind::File => "file",
            LoaderKind::Directory => "directory",
            LoaderKind::Chain => "chain",
            LoaderKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A source of class metadata.
///
/// Implementations must be thread-safe and must not mutate shared state in
/// [`load`](Self::load): every call builds a fresh record.
pub trait ClassMetadataLoader: Send + Sync + fmt::Debug {
    /// Load metadata for a class.
    ///
    /// Returns `Ok(None)` when this loader has no opinion on the class.
    /// Errors are reserved for malformed input the loader was asked to read.
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError>;

    /// Whether [`known_classes`](Self::known_classes) returns anything useful.
    fn is_enumerable(&self) -> bool {
        false
    }

    /// Classes this loader can answer for, in a stable order.
    ///
    /// Non-enumerable loaders return an empty list.
    fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        Ok(Vec::new())
    }

    fn kind(&self) -> LoaderKind {
        LoaderKind::Custom
    }
}

impl<L: ClassMetadataLoader + ?Sized> ClassMetadataLoader for std::sync::Arc<L> {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        (**self).load(class)
    }

    fn is_enumerable(&self) -> bool {
        (**self).is_enumerable()
    }

    fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        (**self).known_classes()
    }

    fn kind(&self) -> LoaderKind {
        (**self).kind()
    }
}

impl<L: ClassMetadataLoader + ?Sized> ClassMetadataLoader for Box<L> {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        (**self).load(class)
    }

    fn is_enumerable(&self) -> bool {
        (**self).is_enumerable()
    }

    fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        (**self).known_classes()
    }

    fn kind(&self) -> LoaderKind {
        (**self).kind()
    }
}
