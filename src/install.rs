//! First-time installation
//!
//! Seeds Baseline and Local from Upstream so later runs have a common
//! ancestor to merge against.

use crate::error::InstallError;
use crate::fsutil;
use crate::tree::FileTree;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// What `install` wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub baseline_files: usize,
    /// Files copied into Local; `None` when an existing Local was kept
    pub local_files: Option<usize>,
}

impl InstallReport {
    pub fn local_preserved(&self) -> bool {
        self.local_files.is_none()
    }
}

/// Copy Upstream into Baseline and, if it does not exist yet, into Local.
///
/// An existing Baseline means the workspace is installed; `force` re-seeds it.
/// An existing Local is never overwritten.
#[instrument(skip(upstream), fields(upstream = %upstream.describe()))]
pub fn install(
    upstream: &dyn FileTree,
    baseline_dir: &Path,
    local_dir: &Path,
    force: bool,
) -> Result<InstallReport, InstallError> {
    if baseline_dir.exists() {
        if !force {
            return Err(InstallError::AlreadyInstalled(baseline_dir.to_path_buf()));
        }
        warn!(baseline = %baseline_dir.display(), "Re-seeding existing baseline");
        fsutil::remove_dir_if_exists(baseline_dir).map_err(|e| InstallError::Copy {
            target: baseline_dir.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    let local_files = if local_dir.exists() {
        info!(local = %local_dir.display(), "Local tree exists, leaving it untouched");
        None
    } else {
        let count = fsutil::copy_tree(upstream, local_dir).map_err(|e| InstallError::Copy {
            target: local_dir.to_path_buf(),
            message: e.to_string(),
        })?;
        Some(count)
    };

    let baseline_files =
        fsutil::copy_tree(upstream, baseline_dir).map_err(|e| InstallError::Copy {
            target: baseline_dir.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(baseline_files, local_files = ?local_files, "Installed");
    Ok(InstallReport {
        baseline_files,
        local_files,
    })
}
