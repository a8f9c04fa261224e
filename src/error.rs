//! Error types for the trimerge 3-way merge engine.
//!
//! Each pipeline stage has its own error enum so callers can tell a failed
//! read (nothing touched) apart from a failed activation (rollback attempted).
//! `SyncError` wraps them all for the operator binary and the `sync` facade.

use crate::types::{Action, TreeSide};
use std::path::PathBuf;
use thiserror::Error;

/// Tree listing and reading errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Failed to walk {}: {message}", root.display())]
    Walk { root: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found in tree: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Plan building errors. Any of these aborts before a single decision is made.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to collect {side} files: {source}")]
    Collect {
        side: TreeSide,
        #[source]
        source: TreeError,
    },

    #[error("Failed to start hashing pool: {0}")]
    Pool(String),
}

/// Plan application errors
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Local tree not found at {}", .0.display())]
    LocalMissing(PathBuf),

    #[error("Failed to create temporary working directory {}: {source}", temp.display())]
    Seed {
        temp: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process {path} ({action}): {message} (local tree untouched)")]
    ApplyFile {
        path: String,
        action: Action,
        message: String,
    },

    #[error("Failed to acquire activation lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to back up {} to {}: {source}", local.display(), backup.display())]
    Backup {
        local: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to activate update (backup restored to {}): {source}", local.display())]
    ActivationRolledBack {
        local: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to activate update AND failed to restore backup: activate error: {source}, \
         restore error: {restore}. Recover manually: mv {} {} (updated tree left at {})",
        backup.display(),
        local.display(),
        temp.display()
    )]
    DoubleFault {
        local: PathBuf,
        backup: PathBuf,
        temp: PathBuf,
        #[source]
        source: std::io::Error,
        restore: std::io::Error,
    },
}

/// First-time install and installation-state errors
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Already installed (baseline found at {}); pass force to re-seed the baseline", .0.display())]
    AlreadyInstalled(PathBuf),

    #[error("Baseline not found at {}; run install first", .0.display())]
    NotInstalled(PathBuf),

    #[error("Failed to copy upstream into {}: {message}", target.display())]
    Copy { target: PathBuf, message: String },
}

/// Backup discovery and restore errors
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("No backup found for {}", .0.display())]
    NoBackup(PathBuf),

    #[error("Local tree {} exists; refusing to overwrite it with a backup", .0.display())]
    LocalExists(PathBuf),

    #[error("Recovery I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Umbrella error for whole-pipeline operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApplyError {
    /// Directory a user should look at to recover by hand, if any survives.
    pub fn recovery_dir(&self) -> Option<&PathBuf> {
        match self {
            ApplyError::DoubleFault { backup, .. } => Some(backup),
            _ => None,
        }
    }
}
