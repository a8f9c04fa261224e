//! Plan applier
//!
//! Stages every change in a temp copy of Local, then swaps it in atomically.
//! Local itself is only touched by the two activation renames.

use crate::error::ApplyError;
use crate::fsutil;
use crate::merge::activate::{self, ActivationLock};
use crate::merge::conflict::{write_conflict_artifacts, ConflictRecord};
use crate::tree::path;
use crate::tree::FileTree;
use crate::types::{Action, Plan, PlanEntry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Prefix of the staging directory created next to Local
pub const TEMP_PREFIX: &str = "tmp-update-";

/// Applier options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOptions {
    /// Hold an advisory lock on Local while activating
    #[serde(default = "default_lock")]
    pub lock: bool,
}

fn default_lock() -> bool {
    true
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            lock: default_lock(),
        }
    }
}

/// Outcome of a successful apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: usize,
    pub deleted: usize,
    pub preserved: usize,
    pub conflicts: Vec<ConflictRecord>,
    pub baseline_refreshed: bool,
    pub warnings: Vec<String>,
}

impl ApplyReport {
    /// Report for an empty plan: nothing was touched.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Files whose content changed in Local (written or removed)
    pub fn total_applied(&self) -> usize {
        self.applied + self.deleted
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Removes the staging directory unless disarmed.
struct TempGuard {
    path: PathBuf,
    armed: bool,
}

impl TempGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = fsutil::remove_dir_if_exists(&self.path) {
            warn!(temp = %self.path.display(), error = %e, "Failed to remove temporary directory");
        }
    }
}

/// Applies a `Plan` to a Local directory
pub struct PlanApplier<'a> {
    upstream: &'a dyn FileTree,
    baseline_dir: PathBuf,
    local_dir: PathBuf,
    options: ApplyOptions,
}

impl<'a> PlanApplier<'a> {
    pub fn new(
        upstream: &'a dyn FileTree,
        baseline_dir: impl Into<PathBuf>,
        local_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            upstream,
            baseline_dir: baseline_dir.into(),
            local_dir: local_dir.into(),
            options: ApplyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ApplyOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply `plan`. An empty merge list returns at once without touching
    /// the filesystem.
    #[instrument(skip(self, plan), fields(local = %self.local_dir.display(), entries = plan.merge.len()))]
    pub fn apply(&self, plan: &Plan) -> Result<ApplyReport, ApplyError> {
        if plan.merge.is_empty() {
            info!("Nothing to apply");
            return Ok(ApplyReport::noop());
        }
        let start = Instant::now();

        let local = path::absolute_dir(&self.local_dir)
            .map_err(|_| ApplyError::LocalMissing(self.local_dir.clone()))?;
        if !local.is_dir() {
            return Err(ApplyError::LocalMissing(self.local_dir.clone()));
        }
        let parent = local
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ApplyError::LocalMissing(local.clone()))?;

        let ts = chrono::Utc::now().timestamp();
        let temp = parent.join(format!("{}{}", TEMP_PREFIX, ts));
        let mut guard = TempGuard::new(temp.clone());

        info!(temp = %temp.display(), "Seeding temporary working directory");
        fsutil::remove_dir_if_exists(&temp)
            .and_then(|_| fsutil::copy_dir(&local, &temp))
            .map_err(|source| ApplyError::Seed {
                temp: temp.clone(),
                source,
            })?;

        let mut report = ApplyReport::default();
        for entry in &plan.merge {
            self.apply_entry(entry, &local, &temp, &mut report)?;
        }

        if report.has_conflicts() {
            warn!(
                count = report.conflicts.len(),
                "Conflicts need manual resolution"
            );
            for conflict in &report.conflicts {
                warn!(path = %conflict.path, reason = %conflict.reason, "Conflict");
            }
        }

        let activation = {
            let _lock = if self.options.lock {
                Some(ActivationLock::acquire(&local)?)
            } else {
                None
            };
            let backup = activate::backup_path(&local, ts);
            match activate::activate(&local, &temp, &backup) {
                Ok(activation) => activation,
                Err(e) => {
                    if matches!(e, ApplyError::DoubleFault { .. }) {
                        guard.disarm();
                    }
                    return Err(e);
                }
            }
        };
        guard.disarm();
        debug!(backup = %activation.backup.display(), "Previous local tree backed up");
        report.warnings.extend(activation.warnings);

        match self.refresh_baseline() {
            Ok(count) => {
                debug!(files = count, "Baseline refreshed");
                report.baseline_refreshed = true;
            }
            Err(message) => {
                warn!("{}", message);
                report.warnings.push(message);
            }
        }

        info!(
            applied = report.applied,
            deleted = report.deleted,
            preserved = report.preserved,
            conflicts = report.conflicts.len(),
            duration_ms = start.elapsed().as_millis(),
            "Update applied"
        );
        Ok(report)
    }

    fn apply_entry(
        &self,
        entry: &PlanEntry,
        local: &Path,
        temp: &Path,
        report: &mut ApplyReport,
    ) -> Result<(), ApplyError> {
        let fail = |message: String| ApplyError::ApplyFile {
            path: entry.path.clone(),
            action: entry.action,
            message,
        };
        path::validate_relative(&entry.path).map_err(|e| fail(e.to_string()))?;

        match entry.action {
            Action::Apply => {
                fsutil::copy_tree_file(self.upstream, &entry.path, temp)
                    .map_err(|e| fail(e.to_string()))?;
                debug!(path = %entry.path, "Applied upstream version");
                report.applied += 1;
            }
            Action::Delete => {
                fsutil::remove_contained(temp, &entry.path).map_err(|e| fail(e.to_string()))?;
                debug!(path = %entry.path, "Deleted");
                report.deleted += 1;
            }
            Action::Conflict => {
                let record = write_conflict_artifacts(
                    self.upstream,
                    local,
                    temp,
                    &entry.path,
                    &entry.reason,
                )?;
                report.conflicts.push(record);
            }
            Action::PreserveLocal => report.preserved += 1,
            Action::Keep => {}
        }
        Ok(())
    }

    /// Mirror Upstream into Baseline. Errors are returned as messages since
    /// a stale Baseline only causes spurious conflicts on the next run.
    #[instrument(skip(self), fields(baseline = %self.baseline_dir.display()))]
    fn refresh_baseline(&self) -> Result<usize, String> {
        fsutil::remove_dir_if_exists(&self.baseline_dir).map_err(|e| {
            format!(
                "failed to clear baseline {}: {}",
                self.baseline_dir.display(),
                e
            )
        })?;
        fsutil::copy_tree(self.upstream, &self.baseline_dir).map_err(|e| {
            format!(
                "failed to update baseline {}: {}",
                self.baseline_dir.display(),
                e
            )
        })
    }
}

/// Apply `plan` with default options.
pub fn apply_plan(
    plan: &Plan,
    upstream: &dyn FileTree,
    baseline_dir: &Path,
    local_dir: &Path,
) -> Result<ApplyReport, ApplyError> {
    PlanApplier::new(upstream, baseline_dir, local_dir).apply(plan)
}
