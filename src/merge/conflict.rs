//! Conflict artifacts
//!
//! A conflicted path is never overwritten. Instead three siblings are written
//! next to it: `<path>.upstream`, `<path>.conflict` and `<path>.README`.

use crate::error::ApplyError;
use crate::fsutil;
use crate::tree::path;
use crate::tree::FileTree;
use crate::types::Action;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const UPSTREAM_SUFFIX: &str = ".upstream";
pub const CONFLICT_SUFFIX: &str = ".conflict";
pub const README_SUFFIX: &str = ".README";

/// An unresolved path and the artifacts written for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub path: String,
    pub reason: String,
    /// Relative paths of the artifacts actually written
    pub artifacts: Vec<String>,
}

/// Guidance text placed in `<path>.README`.
pub fn readme_text(rel: &str, has_upstream: bool, has_local: bool) -> String {
    let mut files = String::new();
    if has_local {
        files.push_str(&format!("- {}{}  - your local version\n", rel, CONFLICT_SUFFIX));
    }
    if has_upstream {
        files.push_str(&format!("- {}{}  - new upstream version\n", rel, UPSTREAM_SUFFIX));
    } else {
        files.push_str("- (no .upstream file: upstream removed this path)\n");
    }
    if has_local {
        files.push_str(&format!("- {}  - current version, left untouched\n", rel));
    } else {
        files.push_str(&format!("- {}  - deleted locally; not recreated\n", rel));
    }

    format!(
        "CONFLICT RESOLUTION NEEDED: {rel}\n\
         \n\
         This file changed both upstream and locally, and the changes cannot be\n\
         merged automatically.\n\
         \n\
         Files created for manual resolution:\n\
         {files}\
         \n\
         To resolve:\n\
         1. Compare the {conflict} and {upstream} versions\n\
         2. Edit {rel} so it holds the merged content you want\n\
            (delete {rel} if you want it gone)\n\
         3. Delete {rel}{conflict}, {rel}{upstream} and {rel}{readme}\n",
        rel = rel,
        files = files,
        conflict = CONFLICT_SUFFIX,
        upstream = UPSTREAM_SUFFIX,
        readme = README_SUFFIX,
    )
}

/// Write the conflict artifacts for `rel` into `target_root`.
///
/// Upstream content comes from `upstream`, local content from `local_root`
/// (the live tree, which the temp copy mirrors). The target path itself is
/// not touched.
pub fn write_conflict_artifacts(
    upstream: &dyn FileTree,
    local_root: &Path,
    target_root: &Path,
    rel: &str,
    reason: &str,
) -> Result<ConflictRecord, ApplyError> {
    let fail = |message: String| ApplyError::ApplyFile {
        path: rel.to_string(),
        action: Action::Conflict,
        message,
    };

    let artifact = |suffix: &str| format!("{}{}", rel, suffix);
    let mut artifacts = Vec::new();

    let has_upstream = upstream
        .contains(rel)
        .map_err(|e| fail(format!("failed to look up upstream file: {}", e)))?;
    if has_upstream {
        let name = artifact(UPSTREAM_SUFFIX);
        let mut reader = upstream
            .open(rel)
            .map_err(|e| fail(format!("failed to open upstream file: {}", e)))?;
        fsutil::write_contained(&mut reader, target_root, &name)
            .map_err(|e| fail(format!("failed to write upstream conflict file: {}", e)))?;
        artifacts.push(name);
    }

    let local_path = path::join_relative(local_root, rel);
    let has_local = local_path.is_file();
    if has_local {
        let name = artifact(CONFLICT_SUFFIX);
        let mut reader = fs::File::open(&local_path)
            .map_err(|e| fail(format!("failed to open local file: {}", e)))?;
        fsutil::write_contained(&mut reader, target_root, &name)
            .map_err(|e| fail(format!("failed to write conflict file: {}", e)))?;
        artifacts.push(name);
    }

    let name = artifact(README_SUFFIX);
    let text = readme_text(rel, has_upstream, has_local);
    fsutil::write_contained(&mut text.as_bytes(), target_root, &name)
        .map_err(|e| fail(format!("failed to create conflict README: {}", e)))?;
    artifacts.push(name);

    Ok(ConflictRecord {
        path: rel.to_string(),
        reason: reason.to_string(),
        artifacts,
    })
}
