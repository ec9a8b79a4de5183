//! mapping::loader::reflection
//!
//! Loaders backed by the [`TypeRegistry`].
//!
//! [`ReflectionLoader`] produces skeletal records: one property per
//! registered field, every setting left unset. [`AnnotationLoader`] produces
//! records from the attributes declared alongside each type. Neither can
//! enumerate classes, so both are skipped by the cache warmer.

use std::sync::Arc;

use super::{ClassMetadataLoader, LoaderKind, TypeRegistry};
use crate::mapping::{ClassMetadata, MappingError, PropertyMetadata};

/// Skeletal metadata from registered field names.
#[derive(Debug, Clone)]
pub struct ReflectionLoader {
    registry: Arc<TypeRegistry>,
}

impl ReflectionLoader {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl ClassMetadataLoader for ReflectionLoader {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        let Some(descriptor) = self.registry.get_with_type_path(class) else {
            return Ok(None);
        };

        let metadata = descriptor
            .fields()
            .iter()
            .fold(ClassMetadata::new(class), |metadata, field| {
                metadata.with_property(PropertyMetadata::new(field.name()))
            });

        Ok(Some(metadata))
    }

    fn kind(&self) -> LoaderKind {
        LoaderKind::Reflection
    }
}

/// Metadata from attributes declared on registered types.
///
/// Only annotated fields appear in the record. A type with no attributes at
/// all yields `None`, leaving the decision to other loaders.
#[derive(Debug, Clone)]
pub struct AnnotationLoader {
    registry: Arc<TypeRegistry>,
}

impl AnnotationLoader {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl ClassMetadataLoader for AnnotationLoader {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        let Some(descriptor) = self.registry.get_with_type_path(class) else {
            return Ok(None);
        };

        if !descriptor.has_attributes() {
            return Ok(None);
        }

        let mut metadata = ClassMetadata::new(class);
        if let Some(root) = descriptor.xml_root() {
            metadata.set_xml_root(root);
        }

        for attributes in descriptor.fields().iter().filter_map(|f| f.attributes()) {
            metadata.add_property(attributes.clone());
        }

        Ok(Some(metadata))
    }

    fn kind(&self) -> LoaderKind {
        LoaderKind::Annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TypeDescriptor;

    fn registry() -> Arc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.insert(
            TypeDescriptor::new("acme::Model")
                .with_xml_root("model")
                .field("id")
                .annotated("foo", |p| p.with_alias("bar").with_groups(["api"])),
        );
        registry.insert(TypeDescriptor::new("acme::Bare").field("x"));
        Arc::new(registry)
    }

    #[test]
    fn reflection_yields_names_only() {
        let loader = ReflectionLoader::new(registry());
        let metadata = loader.load("acme::Model").expect("load").expect("known");

        let names: Vec<_> = metadata.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["id", "foo"]);
        assert_eq!(metadata.xml_root(), None);
        assert_eq!(metadata.property("foo").unwrap().alias(), None);
    }

    #[test]
    fn reflection_unknown_class() {
        let loader = ReflectionLoader::new(registry());
        assert!(loader.load("acme::Missing").expect("load").is_none());
        assert!(!loader.is_enumerable());
        assert_eq!(loader.kind(), LoaderKind::Reflection);
    }

    #[test]
    fn annotation_yields_declared_attributes() {
        let loader = AnnotationLoader::new(registry());
        let metadata = loader.load("acme::Model").expect("load").expect("known");

        assert_eq!(metadata.xml_root(), Some("model"));
        assert!(!metadata.has_property("id"));

        let foo = metadata.property("foo").expect("foo");
        assert_eq!(foo.alias(), Some("bar"));
        assert!(foo.groups().contains("api"));
    }

    #[test]
    fn annotation_without_attributes_has_no_opinion() {
        let loader = AnnotationLoader::new(registry());
        assert!(loader.load("acme::Bare").expect("load").is_none());
        assert!(!loader.is_enumerable());
    }
}
