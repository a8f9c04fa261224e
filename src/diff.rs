//! Two-way tree comparison
//!
//! Classifies how a path changed between an older tree and a newer one. The
//! plan builder uses it for its diagnostic sections; `status` uses it to show
//! upstream-vs-baseline and baseline-vs-local without building a full plan.

use crate::tree::TreeHashes;
use crate::types::{ChangeEntry, ChangeKind, ContentHash, TreeSide};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One changed path between two trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// How `to` differs from `from`, or `None` when the path is unchanged.
pub fn classify_change(from: Option<&ContentHash>, to: Option<&ContentHash>) -> Option<ChangeKind> {
    match (from, to) {
        (None, None) => None,
        (None, Some(_)) => Some(ChangeKind::New),
        (Some(_), None) => Some(ChangeKind::Deleted),
        (Some(a), Some(b)) if a != b => Some(ChangeKind::Modified),
        (Some(_), Some(_)) => None,
    }
}

/// Diagnostic entry for a change observed on `side` relative to Baseline.
pub fn change_entry(
    path: &str,
    from: Option<&ContentHash>,
    to: Option<&ContentHash>,
    side: TreeSide,
) -> Option<ChangeEntry> {
    let change = classify_change(from, to)?;
    let reason = match change {
        ChangeKind::New => format!("new file in {}", side),
        ChangeKind::Modified => format!("modified in {}", side),
        ChangeKind::Deleted => format!("deleted in {}", side),
    };
    Some(ChangeEntry {
        path: path.to_string(),
        change,
        reason,
    })
}

/// Compare two hash maps; changes are sorted by path.
pub fn diff_hashes(from: &TreeHashes, to: &TreeHashes) -> Vec<TreeChange> {
    let paths: BTreeSet<&String> = from.keys().chain(to.keys()).collect();
    paths
        .into_iter()
        .filter_map(|path| {
            classify_change(from.get(path), to.get(path)).map(|kind| TreeChange {
                path: path.clone(),
                kind,
            })
        })
        .collect()
}
