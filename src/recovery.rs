//! Backup discovery and manual recovery
//!
//! A crash or double fault during activation leaves the previous Local in a
//! `<local>.backup-<ts>` sibling. These helpers find and restore it.

use crate::error::RecoveryError;
use crate::merge::apply::TEMP_PREFIX;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Parse `<name>.backup-<ts>[-<n>]` into `(ts, n)`.
fn parse_backup_suffix(file_name: &str, local_name: &str) -> Option<(i64, u32)> {
    let rest = file_name.strip_prefix(local_name)?.strip_prefix(".backup-")?;
    match rest.split_once('-') {
        Some((ts, n)) => Some((ts.parse().ok()?, n.parse().ok()?)),
        None => Some((rest.parse().ok()?, 0)),
    }
}

fn sibling_names(local: &Path) -> Result<(PathBuf, Vec<String>), RecoveryError> {
    let parent = match local.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let read = fs::read_dir(&parent).map_err(|source| RecoveryError::Io {
        path: parent.clone(),
        source,
    })?;
    let names = read
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    Ok((parent, names))
}

/// Backup directories left next to `local`, newest first.
pub fn find_backups(local: &Path) -> Result<Vec<PathBuf>, RecoveryError> {
    let local_name = match local.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return Ok(Vec::new()),
    };
    let (parent, names) = sibling_names(local)?;

    let mut backups: Vec<((i64, u32), PathBuf)> = names
        .into_iter()
        .filter_map(|name| {
            parse_backup_suffix(&name, &local_name).map(|key| (key, parent.join(&name)))
        })
        .filter(|(_, path)| path.is_dir())
        .collect();
    backups.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// Staging directories left next to `local` by interrupted runs.
pub fn find_stale_temps(local: &Path) -> Result<Vec<PathBuf>, RecoveryError> {
    let (parent, mut names) = sibling_names(local)?;
    names.retain(|name| {
        name.strip_prefix(TEMP_PREFIX)
            .map(|ts| !ts.is_empty() && ts.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    });
    names.sort();
    Ok(names.into_iter().map(|n| parent.join(n)).collect())
}

/// Move the newest backup back to `local`. Only valid when Local is gone.
#[instrument(fields(local = %local.display()))]
pub fn restore_backup(local: &Path) -> Result<PathBuf, RecoveryError> {
    if local.exists() {
        return Err(RecoveryError::LocalExists(local.to_path_buf()));
    }
    let backup = find_backups(local)?
        .into_iter()
        .next()
        .ok_or_else(|| RecoveryError::NoBackup(local.to_path_buf()))?;

    fs::rename(&backup, local).map_err(|source| RecoveryError::Io {
        path: backup.clone(),
        source,
    })?;
    info!(backup = %backup.display(), "Restored local tree from backup");
    Ok(backup)
}
