//! mapping::loader::registry
//!
//! Registry of type shapes used by the reflection and annotation loaders.
//!
//! # Design
//!
//! Rust has no runtime reflection, so types describe themselves through the
//! [`Mapped`] trait and are registered once at startup. A registered
//! [`TypeDescriptor`] carries two layers of information:
//!
//! - the **shape**: the type path and its field names, read by
//!   [`ReflectionLoader`](super::ReflectionLoader)
//! - the **attributes**: per-field and per-type serializer settings declared
//!   next to the type definition, read by
//!   [`AnnotationLoader`](super::AnnotationLoader)
//!
//! The registry is built before the loaders and then shared read-only, so
//! lookups need no locking.
//!
//! # Example
//!
//! ```
//! use metamap::mapping::{Mapped, TypeDescriptor, TypeRegistry};
//!
//! struct Model {
//!     foo: String,
//!     secret: String,
//! }
//!
//! impl Mapped for Model {
//!     fn type_path() -> &'static str {
//!         "acme::Model"
//!     }
//!
//!     fn type_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::new(Self::type_path())
//!             .annotated("foo", |p| p.with_alias("bar"))
//!             .annotated("secret", |p| p.with_readable(false))
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Model>();
//! assert!(registry.contains("acme::Model"));
//! ```

use std::collections::HashMap;

use crate::mapping::PropertyMetadata;

/// A type that can describe its serializable shape.
pub trait Mapped {
    /// Fully-qualified name used as the class identity.
    fn type_path() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Field names and declared serializer attributes.
    fn type_descriptor() -> TypeDescriptor;
}

/// One field of a registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    attributes: Option<PropertyMetadata>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes, if the field carries any.
    pub fn attributes(&self) -> Option<&PropertyMetadata> {
        self.attributes.as_ref()
    }
}

/// The shape and declared attributes of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    type_path: String,
    xml_root: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(type_path: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            xml_root: None,
            fields: Vec::new(),
        }
    }

    /// Declare a plain field with no attributes.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            attributes: None,
        });
        self
    }

    /// Declare a field together with its serializer attributes.
    ///
    /// `declare` receives an empty [`PropertyMetadata`] named after the field.
    pub fn annotated<F>(mut self, name: impl Into<String>, declare: F) -> Self
    where
        F: FnOnce(PropertyMetadata) -> PropertyMetadata,
    {
        let name = name.into();
        let attributes = declare(PropertyMetadata::new(name.clone()));
        self.fields.push(FieldDescriptor {
            name,
            attributes: Some(attributes),
        });
        self
    }

    /// Declare the type-level XML root attribute.
    pub fn with_xml_root(mut self, root: impl Into<String>) -> Self {
        self.xml_root = Some(root.into());
        self
    }

    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    pub fn xml_root(&self) -> Option<&str> {
        self.xml_root.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Whether any attribute is declared on the type or its fields.
    pub fn has_attributes(&self) -> bool {
        self.xml_root.is_some() || self.fields.iter().any(|f| f.attributes.is_some())
    }
}

/// Registered type descriptors, keyed by type path.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type through its [`Mapped`] implementation.
    ///
    /// Registering the same type twice replaces the earlier descriptor.
    pub fn register<T: Mapped>(&mut self) {
        self.insert(T::type_descriptor());
    }

    /// Insert a descriptor built by hand.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types
            .insert(descriptor.type_path.clone(), descriptor);
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_path)
    }

    pub fn contains(&self, type_path: &str) -> bool {
        self.types.contains_key(type_path)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }
}
