//! Plan builder
//!
//! Hashes Upstream, Baseline and Local, unions their paths and runs the
//! decision table per path. Never writes to disk.

use crate::diff::change_entry;
use crate::error::PlanError;
use crate::merge::decide::decide;
use crate::tree::{hash_tree, FileTree, TreeHashes};
use crate::types::{Action, Plan, PlanEntry, TreeSide};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Builds a `Plan` from three trees
pub struct PlanBuilder<'a> {
    upstream: &'a dyn FileTree,
    baseline: &'a dyn FileTree,
    local: &'a dyn FileTree,
    jobs: Option<usize>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        upstream: &'a dyn FileTree,
        baseline: &'a dyn FileTree,
        local: &'a dyn FileTree,
    ) -> Self {
        Self {
            upstream,
            baseline,
            local,
            jobs: None,
        }
    }

    /// Bound the hashing pool. `None` uses the global rayon pool.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Hash all three trees and compute the plan.
    ///
    /// Fails fast: if any tree cannot be hashed, no plan is returned.
    #[instrument(skip(self), fields(
        upstream = %self.upstream.describe(),
        baseline = %self.baseline.describe(),
        local = %self.local.describe()
    ))]
    pub fn build(&self) -> Result<Plan, PlanError> {
        let start = Instant::now();
        info!("Calculating 3-way merge plan");

        let (upstream, baseline, local) = match self.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| PlanError::Pool(e.to_string()))?
                .install(|| self.hash_all())?,
            None => self.hash_all()?,
        };

        let plan = plan_from_hashes(&upstream, &baseline, &local);

        info!(
            merge_entries = plan.merge.len(),
            upstream_changes = plan.upstream_changes.len(),
            local_changes = plan.local_changes.len(),
            conflicts = plan.count(Action::Conflict),
            duration_ms = start.elapsed().as_millis(),
            "Plan built"
        );
        Ok(plan)
    }

    fn hash_all(&self) -> Result<(TreeHashes, TreeHashes, TreeHashes), PlanError> {
        hash_trees(self.upstream, self.baseline, self.local)
    }
}

/// Hash Upstream, Baseline and Local concurrently on the current rayon pool.
///
/// Errors name the side that failed.
pub fn hash_trees(
    upstream: &dyn FileTree,
    baseline: &dyn FileTree,
    local: &dyn FileTree,
) -> Result<(TreeHashes, TreeHashes, TreeHashes), PlanError> {
    let (upstream, (baseline, local)) = rayon::join(
        || hash_tree(upstream),
        || rayon::join(|| hash_tree(baseline), || hash_tree(local)),
    );

    let upstream = upstream.map_err(|source| PlanError::Collect {
        side: TreeSide::Upstream,
        source,
    })?;
    let baseline = baseline.map_err(|source| PlanError::Collect {
        side: TreeSide::Baseline,
        source,
    })?;
    let local = local.map_err(|source| PlanError::Collect {
        side: TreeSide::Local,
        source,
    })?;
    Ok((upstream, baseline, local))
}

/// Build a plan from three trees with the default pool.
pub fn build_plan(
    upstream: &dyn FileTree,
    baseline: &dyn FileTree,
    local: &dyn FileTree,
) -> Result<Plan, PlanError> {
    PlanBuilder::new(upstream, baseline, local).build()
}

/// Compute a plan from already-hashed trees. Paths are visited in sorted order.
pub fn plan_from_hashes(upstream: &TreeHashes, baseline: &TreeHashes, local: &TreeHashes) -> Plan {
    let paths: BTreeSet<&String> = upstream
        .keys()
        .chain(baseline.keys())
        .chain(local.keys())
        .collect();

    let mut plan = Plan::default();

    for path in paths {
        let u = upstream.get(path);
        let b = baseline.get(path);
        let l = local.get(path);

        if let Some(entry) = change_entry(path, b, u, TreeSide::Upstream) {
            plan.upstream_changes.push(entry);
        }
        if let Some(entry) = change_entry(path, b, l, TreeSide::Local) {
            plan.local_changes.push(entry);
        }

        let (action, reason) = decide(u, b, l);
        if action != Action::Keep {
            debug!(path = %path, action = %action, reason, "Merge decision");
            plan.merge.push(PlanEntry {
                path: path.clone(),
                action,
                reason: reason.to_string(),
            });
        }
    }

    plan
}
