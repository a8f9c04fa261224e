//! File trees
//!
//! Abstracts the three trees of a merge (Upstream, Baseline, Local) behind
//! `FileTree`, and reduces any tree to a deterministic `path -> hash` map.

pub mod hasher;
pub mod path;
pub mod source;
pub mod walker;

pub use hasher::{hash_tree, TreeHashes};
pub use source::{DirTree, FileTree, MemoryTree};
