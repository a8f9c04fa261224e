//! Shared test utilities for integration tests
//!
//! `TestWorkspace` lays out upstream/, baseline/ and local/ side by side in a
//! temp directory, the way a real workspace does.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trimerge::{DirTree, MemoryTree};

pub struct TestWorkspace {
    pub dir: TempDir,
    pub upstream: PathBuf,
    pub baseline: PathBuf,
    pub local: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let upstream = dir.path().join("upstream");
        let baseline = dir.path().join("baseline");
        let local = dir.path().join("local");
        for d in [&upstream, &baseline, &local] {
            fs::create_dir_all(d).unwrap();
        }
        Self {
            dir,
            upstream,
            baseline,
            local,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write the same file into all three trees.
    pub fn write_all(&self, rel: &str, content: &str) {
        for root in [&self.upstream, &self.baseline, &self.local] {
            write(root, rel, content);
        }
    }

    pub fn upstream_tree(&self) -> DirTree {
        DirTree::new(&self.upstream)
    }

    pub fn baseline_tree(&self) -> DirTree {
        DirTree::new(&self.baseline)
    }

    pub fn local_tree(&self) -> DirTree {
        DirTree::new(&self.local)
    }

    /// Names in the workspace root left behind by apply (temp and backup dirs).
    pub fn leftovers(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("tmp-update-") || n.contains(".backup-"))
            .collect();
        names.sort();
        names
    }
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// Every file under `root` with its content, sorted by relative path.
pub fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    let tree = DirTree::new(root);
    let mut out = Vec::new();
    for rel in trimerge::FileTree::list(&tree).unwrap() {
        let data = trimerge::FileTree::read(&tree, &rel).unwrap();
        out.push((rel, data));
    }
    out
}

pub fn memory_tree(files: &[(&str, &str)]) -> MemoryTree {
    files.iter().map(|(p, d)| (*p, d.as_bytes())).collect()
}
