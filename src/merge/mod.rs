//! 3-way merge: decide, plan, apply
//!
//! `decide` is the pure table, `plan` builds a `Plan` from three trees without
//! touching disk, and `apply` stages the plan in a temp copy of Local and
//! activates it with `activate`.

pub mod activate;
pub mod apply;
pub mod conflict;
pub mod decide;
pub mod plan;

pub use apply::{apply_plan, ApplyOptions, ApplyReport, PlanApplier};
pub use conflict::ConflictRecord;
pub use decide::decide;
pub use plan::{build_plan, plan_from_hashes, PlanBuilder};
