//! mapping::loader::document
//!
//! Mapping document schema and parser.
//!
//! # Format
//!
//! A mapping document names one class and lists its properties in order.
//! Documents are TOML (`.toml`) or JSON (`.json`); the extension selects the
//! parser. Unknown fields are rejected.
//!
//! ```toml
//! class = "acme::model::Model"
//! xml_root = "model"
//!
//! [[properties]]
//! name = "foo"
//! alias = "bar"
//! type = "int"
//! readable = false
//! since = "1.0.0"
//! until = "2.0.0"
//! groups = ["bar"]
//! xml_attribute = true
//! ```
//!
//! # Validation
//!
//! After parsing, the class name must be non-empty, property names must be
//! non-empty and unique, and `since`/`until` must be valid versions.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::exclusion::parse_version;
use crate::mapping::{ClassMetadata, MappingError, PropertyMetadata};

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(DocumentFormat::Toml),
            Some("json") => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

/// A parsed mapping document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingDocument {
    /// Target class.
    pub class: String,

    #[serde(default)]
    pub xml_root: Option<String>,

    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
}

/// One property entry in a mapping document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyDeclaration {
    pub name: String,
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
    pub readable: Option<bool>,
    pub writable: Option<bool>,
    pub accessor: Option<String>,
    pub mutator: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub max_depth: Option<u32>,
    pub groups: BTreeSet<String>,
    pub xml_attribute: Option<bool>,
    pub xml_inline: Option<bool>,
    pub xml_value: Option<bool>,
    pub xml_entry: Option<String>,
    pub xml_entry_attribute: Option<String>,
    pub xml_key_as_attribute: Option<bool>,
    pub xml_key_as_node: Option<bool>,
}

impl PropertyDeclaration {
    fn to_metadata(&self) -> PropertyMetadata {
        let mut property = PropertyMetadata::new(self.name.clone());

        if let Some(v) = &self.alias {
            property = property.with_alias(v.clone());
        }
        if let Some(v) = &self.type_hint {
            property = property.with_type(v.clone());
        }
        if let Some(v) = self.readable {
            property = property.with_readable(v);
        }
        if let Some(v) = self.writable {
            property = property.with_writable(v);
        }
        if let Some(v) = &self.accessor {
            property = property.with_accessor(v.clone());
        }
        if let Some(v) = &self.mutator {
            property = property.with_mutator(v.clone());
        }
        if let Some(v) = &self.since {
            property = property.with_since(v.clone());
        }
        if let Some(v) = &self.until {
            property = property.with_until(v.clone());
        }
        if let Some(v) = self.max_depth {
            property = property.with_max_depth(v);
        }
        if !self.groups.is_empty() {
            property = property.with_groups(self.groups.iter().cloned());
        }
        if let Some(v) = self.xml_attribute {
            property = property.with_xml_attribute(v);
        }
        if let Some(v) = self.xml_inline {
            property = property.with_xml_inline(v);
        }
        if let Some(v) = self.xml_value {
            property = property.with_xml_value(v);
        }
        if let Some(v) = &self.xml_entry {
            property = property.with_xml_entry(v.clone());
        }
        if let Some(v) = &self.xml_entry_attribute {
            property = property.with_xml_entry_attribute(v.clone());
        }
        if let Some(v) = self.xml_key_as_attribute {
            property = property.with_xml_key_as_attribute(v);
        }
        if let Some(v) = self.xml_key_as_node {
            property = property.with_xml_key_as_node(v);
        }

        property
    }
}

impl MappingDocument {
    /// Convert into a fresh metadata record.
    pub fn to_metadata(&self) -> ClassMetadata {
        let mut metadata = ClassMetadata::new(self.class.clone());
        if let Some(root) = &self.xml_root {
            metadata.set_xml_root(root.clone());
        }
        for property in &self.properties {
            metadata.add_property(property.to_metadata());
        }
        metadata
    }

    fn validate(&self) -> Result<(), String> {
        if self.class.trim().is_empty() {
            return Err("class name cannot be empty".into());
        }

        let mut seen = BTreeSet::new();
        for property in &self.properties {
            if property.name.trim().is_empty() {
                return Err("property name cannot be empty".into());
            }
            if !seen.insert(property.name.as_str()) {
                return Err(format!("property '{}' is declared twice", property.name));
            }
            for version in [&property.since, &property.until].into_iter().flatten() {
                parse_version(version).map_err(|e| {
                    format!("property '{}': invalid version '{}': {}", property.name, version, e)
                })?;
            }
        }

        Ok(())
    }
}

/// Parse document text in the given format.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    path: &Path,
) -> Result<MappingDocument, MappingError> {
    let parse_error = |message: String| MappingError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let document: MappingDocument = match format {
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
        }
    };

    document.validate().map_err(parse_error)?;
    Ok(document)
}

/// Read and parse a document from disk.
///
/// # Errors
///
/// - `PathNotFound` if the file does not exist
/// - `Parse` for an unsupported extension or malformed content
/// - `Read` for I/O failures
pub fn read_document(path: &Path) -> Result<MappingDocument, MappingError> {
    if !path.exists() {
        return Err(MappingError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = DocumentFormat::from_path(path).ok_or_else(|| MappingError::Parse {
        path: path.to_path_buf(),
        message: "unsupported mapping format (expected .toml or .json)".into(),
    })?;

    let content = fs::read_to_string(path).map_err(|source| MappingError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&content, format, path)
}
