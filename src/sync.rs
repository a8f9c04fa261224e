//! Workspace-level entry points
//!
//! `SyncContext` resolves the three tree locations from configuration and
//! runs plan, apply, status, install and recovery against them. `sync` is the
//! one-call form for callers that bring their own Upstream (e.g. a bundle
//! compiled into the binary).

use crate::config::{ResolvedPaths, TrimergeConfig};
use crate::error::{ConfigError, InstallError, SyncError};
use crate::install::{self, InstallReport};
use crate::merge::{ApplyOptions, ApplyReport, PlanApplier, PlanBuilder};
use crate::recovery;
use crate::status::{self, SyncStatus};
use crate::tree::walker::WalkerConfig;
use crate::tree::{DirTree, FileTree};
use crate::types::Plan;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Plan and apply in one step.
///
/// Fails with `NotInstalled` when Baseline does not exist yet.
#[instrument(skip(upstream, options), fields(upstream = %upstream.describe()))]
pub fn sync(
    upstream: &dyn FileTree,
    baseline_dir: &Path,
    local_dir: &Path,
    options: ApplyOptions,
) -> Result<(Plan, ApplyReport), SyncError> {
    ensure_installed(baseline_dir)?;
    let baseline = DirTree::new(baseline_dir);
    let local = DirTree::new(local_dir);

    let plan = PlanBuilder::new(upstream, &baseline, &local).build()?;
    let report = PlanApplier::new(upstream, baseline_dir, local_dir)
        .with_options(options)
        .apply(&plan)?;
    Ok((plan, report))
}

fn ensure_installed(baseline_dir: &Path) -> Result<(), SyncError> {
    if baseline_dir.is_dir() {
        Ok(())
    } else {
        Err(InstallError::NotInstalled(baseline_dir.to_path_buf()).into())
    }
}

/// Configured workspace
#[derive(Debug, Clone)]
pub struct SyncContext {
    workspace_root: PathBuf,
    config: TrimergeConfig,
    paths: ResolvedPaths,
}

impl SyncContext {
    pub fn new(workspace_root: impl Into<PathBuf>, config: TrimergeConfig) -> Self {
        let workspace_root = workspace_root.into();
        let paths = config.paths.resolve(&workspace_root);
        Self {
            workspace_root,
            config,
            paths,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &TrimergeConfig {
        &self.config
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// Refuse resolved trees that nest inside one another.
    fn ensure_disjoint(&self) -> Result<(), SyncError> {
        let problems = self.paths.overlaps();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")).into())
        }
    }

    fn walker_config(&self) -> WalkerConfig {
        self.config.walker.clone()
    }

    fn tree(&self, root: &Path) -> DirTree {
        DirTree::new(root).with_walker_config(self.walker_config())
    }

    /// Build the merge plan without touching disk.
    pub fn plan(&self) -> Result<Plan, SyncError> {
        self.ensure_disjoint()?;
        ensure_installed(&self.paths.baseline)?;
        let upstream = self.tree(&self.paths.upstream);
        let baseline = self.tree(&self.paths.baseline);
        let local = self.tree(&self.paths.local);

        let plan = PlanBuilder::new(&upstream, &baseline, &local)
            .with_jobs(self.config.hashing.jobs)
            .build()?;
        Ok(plan)
    }

    /// Build and apply the plan.
    pub fn apply(&self) -> Result<(Plan, ApplyReport), SyncError> {
        let plan = self.plan()?;
        let upstream = self.tree(&self.paths.upstream);
        let report = PlanApplier::new(&upstream, &self.paths.baseline, &self.paths.local)
            .with_options(self.config.apply.clone())
            .apply(&plan)?;
        Ok((plan, report))
    }

    pub fn status(&self) -> Result<SyncStatus, SyncError> {
        self.ensure_disjoint()?;
        ensure_installed(&self.paths.baseline)?;
        let upstream = self.tree(&self.paths.upstream);
        let baseline = self.tree(&self.paths.baseline);
        let local = self.tree(&self.paths.local);
        status::status(&upstream, &baseline, &local)
    }

    pub fn install(&self, force: bool) -> Result<InstallReport, SyncError> {
        self.ensure_disjoint()?;
        let upstream = self.tree(&self.paths.upstream);
        let report = install::install(&upstream, &self.paths.baseline, &self.paths.local, force)?;
        Ok(report)
    }

    /// Restore Local from its newest backup.
    pub fn recover(&self) -> Result<PathBuf, SyncError> {
        let backup = recovery::restore_backup(&self.paths.local)?;
        info!(backup = %backup.display(), "Recovered");
        Ok(backup)
    }
}
