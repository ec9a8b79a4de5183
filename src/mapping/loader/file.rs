//! mapping::loader::file
//!
//! Loader for a single mapping document.

use std::path::{Path, PathBuf};

use super::document::{read_document, MappingDocument};
use super::{ClassMetadataLoader, LoaderKind};
use crate::mapping::{ClassMetadata, MappingError};

/// Serves the one class declared by a mapping document.
///
/// The document is parsed when the loader is created, so a missing or
/// malformed file fails at startup instead of on first lookup.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
    document: MappingDocument,
}

impl FileLoader {
    /// Parse the document at `path`.
    ///
    /// # Errors
    ///
    /// `PathNotFound` if the file does not exist; `Parse`/`Read` otherwise.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, MappingError> {
        let path = path.into();
        let document = read_document(&path)?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The class this document declares.
    pub fn class(&self) -> &str {
        &self.document.class
    }
}

impl ClassMetadataLoader for FileLoader {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        if class != self.document.class {
            return Ok(None);
        }
        Ok(Some(self.document.to_metadata()))
    }

    fn is_enumerable(&self) -> bool {
        true
    }

    fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        Ok(vec![self.document.class.clone()])
    }

    fn kind(&self) -> LoaderKind {
        LoaderKind::File
    }
}
