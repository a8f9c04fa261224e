//! trimerge: 3-way configuration merge
//!
//! Reconciles a changing Upstream template tree with a user-customized Local
//! tree, using Baseline (the last Upstream snapshot synced) as the common
//! ancestor. Content is compared by SHA-256; changes are staged in a temp
//! copy of Local and activated with an atomic directory swap.

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod fsutil;
pub mod install;
pub mod logging;
pub mod merge;
pub mod recovery;
pub mod status;
pub mod sync;
pub mod tree;
pub mod types;

pub use error::{ApplyError, PlanError, SyncError, TreeError};
pub use merge::{apply_plan, build_plan, decide, ApplyReport, PlanApplier, PlanBuilder};
pub use sync::{sync, SyncContext};
pub use tree::{DirTree, FileTree, MemoryTree};
pub use types::{Action, ContentHash, Plan, PlanEntry};
