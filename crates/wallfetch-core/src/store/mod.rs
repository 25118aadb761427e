//! Flat on-disk image store.
//!
//! Presence of the canonical file is the only dedup state: there is no
//! separate index. Downloads land in `.<name>.part` and are renamed into place,
//! so an existing final file is always a complete one.

mod part;

use std::io;
use std::path::{Path, PathBuf};

use crate::item::Item;
use crate::naming::{self, NamingError};

pub use part::{temp_path, PartFile, TEMP_PREFIX, TEMP_SUFFIX};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("part file {0} already closed")]
    Closed(PathBuf),
}

/// Destination directory plus the item → path mapping.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the destination directory if absent. Idempotent.
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|source| StoreError::Create {
            path: self.root.clone(),
            source,
        })
    }

    /// LocalPath for an item: root joined with its canonical file name.
    pub fn path_for(&self, item: &Item) -> Result<PathBuf, NamingError> {
        Ok(self.root.join(naming::canonical_file_name(&item.source_url)?))
    }

    /// True if a completed file exists at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Start writing `path`; see `PartFile`.
    pub fn begin(&self, path: &Path) -> Result<PartFile, StoreError> {
        PartFile::create(path)
    }
}
