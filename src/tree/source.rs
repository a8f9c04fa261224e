//! File tree sources
//!
//! A `FileTree` is anything that can list its files and open one for reading:
//! a plain directory, an in-memory map, or a bundle compiled into the binary.
//! Upstream may be any of these; Baseline and Local are always directories.

use crate::error::TreeError;
use crate::tree::path;
use crate::tree::walker::{Walker, WalkerConfig};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Read-only, addressable hierarchy of files
pub trait FileTree: Send + Sync {
    /// Human-readable description for logs and errors
    fn describe(&self) -> String;

    /// Relative paths (canonical `/` separator) of every regular file, sorted
    fn list(&self) -> Result<Vec<String>, TreeError>;

    /// Open a file by relative path
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send + '_>, TreeError>;

    /// Whether the tree holds a file at `path`
    fn contains(&self, path: &str) -> Result<bool, TreeError> {
        Ok(self.list()?.iter().any(|p| p == path))
    }

    /// Read a whole file into memory
    fn read(&self, path: &str) -> Result<Vec<u8>, TreeError> {
        let mut reader = self.open(path)?;
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|source| TreeError::Read {
                path: path.to_string(),
                source,
            })?;
        Ok(buf)
    }
}

/// A directory on disk
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
    walker_config: WalkerConfig,
}

impl DirTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            walker_config: WalkerConfig::default(),
        }
    }

    /// Set walker config (ignore patterns, symlink policy).
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileTree for DirTree {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn list(&self) -> Result<Vec<String>, TreeError> {
        Walker::with_config(self.root.clone(), self.walker_config.clone()).files()
    }

    fn open(&self, rel: &str) -> Result<Box<dyn Read + Send + '_>, TreeError> {
        path::validate_relative(rel)?;
        let full = path::join_relative(&self.root, rel);
        let file = File::open(&full).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TreeError::NotFound(rel.to_string())
            } else {
                TreeError::Read {
                    path: full.display().to_string(),
                    source,
                }
            }
        })?;
        Ok(Box::new(file))
    }

    fn contains(&self, rel: &str) -> Result<bool, TreeError> {
        path::validate_relative(rel)?;
        Ok(path::join_relative(&self.root, rel).is_file())
    }
}

/// An in-memory tree of `path -> bytes`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a compiled-in table such as `&[("a.md", include_bytes!("a.md"))]`.
    pub fn from_static(entries: &[(&str, &[u8])]) -> Self {
        let mut tree = Self::new();
        for (p, data) in entries {
            tree.insert(*p, data.to_vec());
        }
        tree
    }

    /// Insert or replace a file. The path is normalized to canonical form.
    pub fn insert(&mut self, rel: impl AsRef<str>, data: impl Into<Vec<u8>>) -> &mut Self {
        self.files
            .insert(path::normalize_path_string(rel.as_ref()), data.into());
        self
    }

    pub fn with_file(mut self, rel: impl AsRef<str>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(rel, data);
        self
    }

    pub fn remove(&mut self, rel: &str) -> Option<Vec<u8>> {
        self.files.remove(rel)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: AsRef<str>, D: Into<Vec<u8>>> FromIterator<(P, D)> for MemoryTree {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (p, d) in iter {
            tree.insert(p, d);
        }
        tree
    }
}

impl FileTree for MemoryTree {
    fn describe(&self) -> String {
        format!("<memory: {} files>", self.files.len())
    }

    fn list(&self) -> Result<Vec<String>, TreeError> {
        Ok(self.files.keys().cloned().collect())
    }

    fn open(&self, rel: &str) -> Result<Box<dyn Read + Send + '_>, TreeError> {
        let data = self
            .files
            .get(rel)
            .ok_or_else(|| TreeError::NotFound(rel.to_string()))?;
        Ok(Box::new(Cursor::new(data.as_slice())))
    }

    fn contains(&self, rel: &str) -> Result<bool, TreeError> {
        Ok(self.files.contains_key(rel))
    }
}
