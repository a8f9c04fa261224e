//! Filesystem walker for traversing directory trees

use crate::error::TreeError;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Filesystem entry types, with paths relative to the walk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A regular file with its relative path
    File { path: String },
    /// A directory with its relative path
    Directory { path: String },
}

impl Entry {
    pub fn path(&self) -> &str {
        match self {
            Entry::File { path } | Entry::Directory { path } => path,
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Names to skip anywhere in the tree (e.g. ".git"), or `*.ext` suffixes
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree and collect all entries below the root.
    ///
    /// Returns entries sorted by relative path. Symlinks are skipped unless
    /// `follow_symlinks` is set; anything that is neither file nor directory
    /// is skipped.
    pub fn walk(&self) -> Result<Vec<Entry>, TreeError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_ignore(e));

        for entry in walker {
            let entry = entry.map_err(|e| TreeError::Walk {
                root: self.root.clone(),
                message: e.to_string(),
            })?;

            if entry.depth() == 0 {
                continue;
            }

            let rel = path::relative_path(&self.root, entry.path())?;
            let file_type = entry.file_type();

            if file_type.is_file() {
                entries.push(Entry::File { path: rel });
            } else if file_type.is_dir() {
                entries.push(Entry::Directory { path: rel });
            }
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(entries)
    }

    /// Relative paths of every regular file, sorted.
    pub fn files(&self) -> Result<Vec<String>, TreeError> {
        Ok(self
            .walk()?
            .into_iter()
            .filter_map(|e| match e {
                Entry::File { path } => Some(path),
                Entry::Directory { .. } => None,
            })
            .collect())
    }

    fn should_ignore(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.config.ignore_patterns.iter().any(|pattern| {
            match pattern.strip_prefix('*') {
                Some(suffix) => name.ends_with(suffix),
                None => name == pattern.as_str(),
            }
        })
    }
}
