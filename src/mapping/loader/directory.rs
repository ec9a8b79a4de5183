//! mapping::loader::directory
//!
//! Loader that recursively discovers mapping documents under a root.
//!
//! # Discovery
//!
//! Every `.toml` and `.json` file below the root is parsed as a mapping
//! document; other files are ignored. The tree is walked with file names
//! sorted so the enumerated class list is stable across runs. Symlinks are
//! not followed. Two documents
//! declaring the same class are a configuration error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::document::DocumentFormat;
use super::{ClassMetadataLoader, FileLoader, LoaderKind};
use crate::mapping::{ClassMetadata, MappingError};

/// Serves every class declared under a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    files: Vec<FileLoader>,
    index: BTreeMap<String, usize>,
}

impl DirectoryLoader {
    /// Scan `root` and parse every mapping document found.
    ///
    /// # Errors
    ///
    /// - `PathNotFound` if `root` does not exist or is not a directory
    /// - `DuplicateMapping` if two documents declare the same class
    /// - any error from parsing a discovered document
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, MappingError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(MappingError::PathNotFound { path: root });
        }

        let paths = collect_documents(&root)?;

        let mut files: Vec<FileLoader> = Vec::with_capacity(paths.len());
        let mut index = BTreeMap::new();

        for path in paths {
            let file = FileLoader::new(path)?;
            if let Some(&existing) = index.get(file.class()) {
                let first: &FileLoader = &files[existing];
                return Err(MappingError::DuplicateMapping {
                    class: file.class().to_string(),
                    first: first.path().to_path_buf(),
                    second: file.path().to_path_buf(),
                });
            }
            index.insert(file.class().to_string(), files.len());
            files.push(file);
        }

        debug!(root = %root.display(), classes = files.len(), "scanned mapping directory");

        Ok(Self { root, files, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of discovered mapping documents.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Mapping documents under `root`, in sorted walk order.
///
/// Symlinks are not followed, so a link back into the tree cannot index a
/// document twice.
fn collect_documents(root: &Path) -> Result<Vec<PathBuf>, MappingError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| MappingError::Read {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;

        if entry.file_type().is_file() && DocumentFormat::from_path(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

impl ClassMetadataLoader for DirectoryLoader {
    fn load(&self, class: &str) -> Result<Option<ClassMetadata>, MappingError> {
        match self.index.get(class) {
            Some(&i) => self.files[i].load(class),
            None => Ok(None),
        }
    }

    fn is_enumerable(&self) -> bool {
        true
    }

    fn known_classes(&self) -> Result<Vec<String>, MappingError> {
        Ok(self.files.iter().map(|f| f.class().to_string()).collect())
    }

    fn kind(&self) -> LoaderKind {
        LoaderKind::Directory
    }
}
