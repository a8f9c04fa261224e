//! Atomic activation of an updated tree
//!
//! The prepared temp directory replaces Local with two same-volume renames:
//! Local -> `<local>.backup-<ts>`, then temp -> Local. If the second rename
//! fails the backup is renamed back once. A crash between the two renames
//! leaves the prior content intact in the backup directory.

use crate::error::ApplyError;
use crate::fsutil;
use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Result of a successful swap
#[derive(Debug, Clone)]
pub struct Activation {
    /// Backup directory the previous Local was moved to; still on disk when
    /// cleanup failed
    pub backup: PathBuf,
    pub warnings: Vec<String>,
}

/// Exclusive advisory lock held for the duration of the swap.
///
/// The lock is released when the guard drops and the file closes.
#[derive(Debug)]
pub struct ActivationLock {
    _file: File,
    path: PathBuf,
}

impl ActivationLock {
    /// Lock file path for a Local directory: `<parent>/.<name>.lock`.
    pub fn path_for(local: &Path) -> PathBuf {
        let name = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "local".to_string());
        local
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!(".{}.lock", name))
    }

    /// Block until the exclusive lock on `local` is held.
    pub fn acquire(local: &Path) -> Result<Self, ApplyError> {
        let path = Self::path_for(local);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| ApplyError::Lock {
                path: path.clone(),
                source,
            })?;

        debug!(lock = %path.display(), "Acquiring activation lock");
        FileExt::lock_exclusive(&file).map_err(|source| ApplyError::Lock {
            path: path.clone(),
            source,
        })?;
        debug!(lock = %path.display(), "Activation lock acquired");

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Backup directory name for `local` at unix time `ts`.
///
/// Appends `-N` if an earlier run in the same second left one behind.
pub fn backup_path(local: &Path, ts: i64) -> PathBuf {
    let base = {
        let mut s = local.as_os_str().to_owned();
        s.push(format!(".backup-{}", ts));
        PathBuf::from(s)
    };
    if !base.exists() {
        return base;
    }
    let mut n = 1;
    loop {
        let mut s = base.as_os_str().to_owned();
        s.push(format!("-{}", n));
        let candidate = PathBuf::from(s);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Replace `local` with `temp`, keeping the old tree at `backup` until the
/// swap succeeds.
#[instrument(skip_all, fields(local = %local.display()))]
pub fn activate(local: &Path, temp: &Path, backup: &Path) -> Result<Activation, ApplyError> {
    swap_with(local, temp, backup, |from, to| fs::rename(from, to))
}

/// Swap implementation with an injectable rename, so rollback paths can be
/// exercised without a misbehaving filesystem.
pub(crate) fn swap_with<F>(
    local: &Path,
    temp: &Path,
    backup: &Path,
    rename: F,
) -> Result<Activation, ApplyError>
where
    F: Fn(&Path, &Path) -> io::Result<()>,
{
    rename(local, backup).map_err(|source| ApplyError::Backup {
        local: local.to_path_buf(),
        backup: backup.to_path_buf(),
        source,
    })?;
    debug!(backup = %backup.display(), "Local moved to backup");

    if let Err(source) = rename(temp, local) {
        warn!(error = %source, "Activation rename failed, restoring backup");
        return match rename(backup, local) {
            Ok(()) => Err(ApplyError::ActivationRolledBack {
                local: local.to_path_buf(),
                source,
            }),
            Err(restore) => Err(ApplyError::DoubleFault {
                local: local.to_path_buf(),
                backup: backup.to_path_buf(),
                temp: temp.to_path_buf(),
                source,
                restore,
            }),
        };
    }
    info!("Updated tree activated");

    let mut warnings = Vec::new();
    if let Err(e) = fsutil::remove_dir_if_exists(backup) {
        let msg = format!(
            "failed to clean up backup directory {}: {}",
            backup.display(),
            e
        );
        warn!("{}", msg);
        warnings.push(msg);
    }

    Ok(Activation {
        backup: backup.to_path_buf(),
        warnings,
    })
}
