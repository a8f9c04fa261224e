//! Sync status: what changed upstream, what changed locally, and anything an
//! interrupted run left behind.

use crate::diff::{diff_hashes, TreeChange};
use crate::error::SyncError;
use crate::merge::plan::hash_trees;
use crate::recovery;
use crate::tree::{DirTree, FileTree};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::instrument;

/// Two-way diffs against Baseline plus recovery leftovers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Upstream relative to Baseline: changes since the last sync
    pub upstream_changes: Vec<TreeChange>,
    /// Local relative to Baseline: the user's modifications
    pub local_changes: Vec<TreeChange>,
    /// `<local>.backup-<ts>` directories, newest first
    pub pending_backups: Vec<PathBuf>,
    /// `tmp-update-<ts>` directories from interrupted runs
    pub stale_temps: Vec<PathBuf>,
}

impl SyncStatus {
    pub fn is_clean(&self) -> bool {
        self.upstream_changes.is_empty()
            && self.local_changes.is_empty()
            && self.pending_backups.is_empty()
            && self.stale_temps.is_empty()
    }
}

/// Compare Upstream and Local to Baseline without planning or writing.
#[instrument(skip_all, fields(local = %local.root().display()))]
pub fn status(
    upstream: &dyn FileTree,
    baseline: &dyn FileTree,
    local: &DirTree,
) -> Result<SyncStatus, SyncError> {
    let (upstream_hashes, baseline_hashes, local_hashes) =
        hash_trees(upstream, baseline, local)?;

    Ok(SyncStatus {
        upstream_changes: diff_hashes(&baseline_hashes, &upstream_hashes),
        local_changes: diff_hashes(&baseline_hashes, &local_hashes),
        pending_backups: recovery::find_backups(local.root())?,
        stale_temps: recovery::find_stale_temps(local.root())?,
    })
}
