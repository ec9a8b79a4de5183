//! mapping::metadata
//!
//! Class and property metadata records.
//!
//! # Design
//!
//! A [`ClassMetadata`] describes the serializable shape of one class: an
//! optional XML root name and an ordered list of [`PropertyMetadata`].
//! Property order is insertion order, which gives serializers a
//! deterministic field order.
//!
//! Every optional field is an `Option` (or an empty set for groups) so that
//! "unset" is distinguishable from "explicitly set to the default". This is
//! what makes the additive merge in [`ClassMetadata::merge`] possible: a
//! later record only fills fields the earlier one left unset.
//!
//! # XML styling
//!
//! `xml_attribute`, `xml_value` and `xml_inline` may all be set on one
//! property. This layer does not forbid it; consuming visitors apply the
//! precedence attribute > value > inline (see [`PropertyMetadata::xml_style`]).
//!
//! # Example
//!
//! ```
//! use metamap::mapping::{ClassMetadata, PropertyMetadata};
//!
//! let mut first = ClassMetadata::new("acme::Model");
//! first.add_property(PropertyMetadata::new("foo").with_alias("bar"));
//!
//! let mut second = ClassMetadata::new("acme::Model");
//! second.add_property(PropertyMetadata::new("foo").with_alias("baz").with_groups(["api"]));
//!
//! first.merge(&second);
//! let foo = first.property("foo").unwrap();
//! assert_eq!(foo.alias(), Some("bar"));
//! assert!(foo.groups().contains("api"));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Resolved serialization rules for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Fully-qualified class name (identity key).
    name: String,

    /// Root element name for tree-structured formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xml_root: Option<String>,

    /// Properties in insertion order, unique by name.
    #[serde(default)]
    properties: Vec<PropertyMetadata>,
}

impl ClassMetadata {
    /// Create an empty record for a class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xml_root: None,
            properties: Vec::new(),
        }
    }

    /// The class name this record describes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xml_root(&self) -> Option<&str> {
        self.xml_root.as_deref()
    }

    pub fn set_xml_root(&mut self, root: impl Into<String>) {
        self.xml_root = Some(root.into());
    }

    /// Builder-style variant of [`set_xml_root`](Self::set_xml_root).
    pub fn with_xml_root(mut self, root: impl Into<String>) -> Self {
        self.set_xml_root(root);
        self
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[PropertyMetadata] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// True when no loader contributed anything beyond the class name.
    pub fn is_empty(&self) -> bool {
        self.xml_root.is_none() && self.properties.is_empty()
    }

    /// Add a property, or merge it into the existing one with the same name.
    ///
    /// Existing fields are never overwritten; see [`PropertyMetadata::merge`].
    pub fn add_property(&mut self, property: PropertyMetadata) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => existing.merge(&property),
            None => self.properties.push(property),
        }
    }

    /// Builder-style variant of [`add_property`](Self::add_property).
    pub fn with_property(mut self, property: PropertyMetadata) -> Self {
        self.add_property(property);
        self
    }

    /// Merge a later-resolved record into this one.
    ///
    /// First writer wins for every field: `xml_root` and each property
    /// field are only taken from `other` when unset here. Properties
    /// unknown to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: &ClassMetadata) {
        if self.xml_root.is_none() {
            self.xml_root = other.xml_root.clone();
        }

        for property in &other.properties {
            self.add_property(property.clone());
        }
    }
}

/// Serialization rules for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyMetadata {
    /// In-memory property name.
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,

    /// Declared type hint, used to instantiate values on deserialization.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    type_hint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    readable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    writable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    accessor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    mutator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    since_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    until_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_depth: Option<u32>,

    /// Empty means "member of the implicit default group".
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    groups: BTreeSet<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    xml_attribute: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    xml_inline: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    xml_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    xml_entry: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    xml_entry_attribute: Option<String>,

    /// Tri-state: `None` inherits the visitor's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    xml_key_as_attribute: Option<bool>,

    /// Tri-state: `None` inherits the visitor's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    xml_key_as_node: Option<bool>,
}

/// How a property is laid out in an XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlStyle {
    Element,
    Attribute,
    Value,
    Inline,
}

/// Fill `$target.$field` from `$source.$field` when unset.
macro_rules! fill_unset {
    ($target:ident, $source:ident, $($field:ident),+ $(,)?) => {
        $(
            if $target.$field.is_none() {
                $target.$field = $source.$field.clone();
            }
        )+
    };
}

impl PropertyMetadata {
    /// Create a property with every field unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The external name: the alias when set, otherwise the property name.
    pub fn serialized_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    /// Whether the property participates in serialization (default: true).
    pub fn is_readable(&self) -> bool {
        self.readable.unwrap_or(true)
    }

    /// Whether the property participates in deserialization (default: true).
    pub fn is_writable(&self) -> bool {
        self.writable.unwrap_or(true)
    }

    pub fn accessor(&self) -> Option<&str> {
        self.accessor.as_deref()
    }

    pub fn mutator(&self) -> Option<&str> {
        self.mutator.as_deref()
    }

    pub fn since_version(&self) -> Option<&str> {
        self.since_version.as_deref()
    }

    pub fn until_version(&self) -> Option<&str> {
        self.until_version.as_deref()
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn is_xml_attribute(&self) -> bool {
        self.xml_attribute.unwrap_or(false)
    }

    pub fn is_xml_inline(&self) -> bool {
        self.xml_inline.unwrap_or(false)
    }

    pub fn is_xml_value(&self) -> bool {
        self.xml_value.unwrap_or(false)
    }

    pub fn xml_entry(&self) -> Option<&str> {
        self.xml_entry.as_deref()
    }

    pub fn xml_entry_attribute(&self) -> Option<&str> {
        self.xml_entry_attribute.as_deref()
    }

    pub fn xml_key_as_attribute(&self) -> Option<bool> {
        self.xml_key_as_attribute
    }

    pub fn xml_key_as_node(&self) -> Option<bool> {
        self.xml_key_as_node
    }

    /// Effective XML layout, applying attribute > value > inline.
    pub fn xml_style(&self) -> XmlStyle {
        if self.is_xml_attribute() {
            XmlStyle::Attribute
        } else if self.is_xml_value() {
            XmlStyle::Value
        } else if self.is_xml_inline() {
            XmlStyle::Inline
        } else {
            XmlStyle::Element
        }
    }

    /// Fill every unset field from `other`. Set fields are kept.
    ///
    /// Groups are treated as unset while empty.
    pub fn merge(&mut self, other: &PropertyMetadata) {
        fill_unset!(
            self,
            other,
            alias,
            type_hint,
            readable,
            writable,
            accessor,
            mutator,
            since_version,
            until_version,
            max_depth,
            xml_attribute,
            xml_inline,
            xml_value,
            xml_entry,
            xml_entry_attribute,
            xml_key_as_attribute,
            xml_key_as_node,
        );

        if self.groups.is_empty() {
            self.groups = other.groups.clone();
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_type(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = Some(readable);
        self
    }

    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = Some(writable);
        self
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = Some(accessor.into());
        self
    }

    pub fn with_mutator(mut self, mutator: impl Into<String>) -> Self {
        self.mutator = Some(mutator.into());
        self
    }

    pub fn with_since(mut self, version: impl Into<String>) -> Self {
        self.since_version = Some(version.into());
        self
    }

    pub fn with_until(mut self, version: impl Into<String>) -> Self {
        self.until_version = Some(version.into());
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_xml_attribute(mut self, enabled: bool) -> Self {
        self.xml_attribute = Some(enabled);
        self
    }

    pub fn with_xml_inline(mut self, enabled: bool) -> Self {
        self.xml_inline = Some(enabled);
        self
    }

    pub fn with_xml_value(mut self, enabled: bool) -> Self {
        self.xml_value = Some(enabled);
        self
    }

    pub fn with_xml_entry(mut self, entry: impl Into<String>) -> Self {
        self.xml_entry = Some(entry.into());
        self
    }

    pub fn with_xml_entry_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.xml_entry_attribute = Some(attribute.into());
        self
    }

    pub fn with_xml_key_as_attribute(mut self, enabled: bool) -> Self {
        self.xml_key_as_attribute = Some(enabled);
        self
    }

    pub fn with_xml_key_as_node(mut self, enabled: bool) -> Self {
        self.xml_key_as_node = Some(enabled);
        self
    }
}
