//! Content hashing for file trees using SHA-256

use crate::error::TreeError;
use crate::tree::source::FileTree;
use crate::types::ContentHash;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Map of relative path to content hash for one tree
pub type TreeHashes = BTreeMap<String, ContentHash>;

/// Compute content hash for file bytes
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let digest = Sha256::digest(content);
    ContentHash::from_bytes(digest.into())
}

/// Hash a stream without buffering it whole.
pub fn hash_reader<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<ContentHash> {
    let mut hasher = Sha256::new();
    std::io::copy(reader, &mut hasher)?;
    Ok(ContentHash::from_bytes(hasher.finalize().into()))
}

/// Hash a single file of a tree
pub fn hash_file(tree: &dyn FileTree, path: &str) -> Result<ContentHash, TreeError> {
    let mut reader = tree.open(path)?;
    hash_reader(&mut reader).map_err(|source| TreeError::Read {
        path: path.to_string(),
        source,
    })
}

/// Hash every regular file in a tree.
///
/// Files are hashed in parallel on the current rayon pool; the result is
/// order-independent. Any unreadable file fails the whole map.
#[instrument(skip(tree), fields(tree = %tree.describe()))]
pub fn hash_tree(tree: &dyn FileTree) -> Result<TreeHashes, TreeError> {
    let start = Instant::now();
    let paths = tree.list()?;
    debug!(file_count = paths.len(), "Listed tree");

    let hashes = paths
        .into_par_iter()
        .map(|path| {
            let hash = hash_file(tree, &path)?;
            Ok((path, hash))
        })
        .collect::<Result<TreeHashes, TreeError>>()?;

    info!(
        file_count = hashes.len(),
        duration_ms = start.elapsed().as_millis(),
        "Tree hashed"
    );
    Ok(hashes)
}
