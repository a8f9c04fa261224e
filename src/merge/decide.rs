//! 3-way merge decision table
//!
//! Pure function from the presence/hash triple of one path to an `Action`.
//! Baseline is the last Upstream snapshot that was synced, so comparing each
//! side to it tells a system change apart from a user change.

use crate::types::{Action, ContentHash};

/// Decide the merge action for one path.
///
/// Returns the action and a short human-readable reason. Only `keep` results
/// are dropped from a plan.
pub fn decide(
    upstream: Option<&ContentHash>,
    baseline: Option<&ContentHash>,
    local: Option<&ContentHash>,
) -> (Action, &'static str) {
    match (upstream, baseline, local) {
        (Some(u), Some(b), Some(l)) => {
            let local_unchanged = l == b;
            let upstream_unchanged = u == b;
            match (local_unchanged, upstream_unchanged) {
                (true, true) => (Action::Keep, "no changes in upstream or local"),
                (true, false) => (
                    Action::Apply,
                    "fast-forward upstream changes (local unchanged)",
                ),
                (false, true) => (
                    Action::PreserveLocal,
                    "preserve local modifications (upstream unchanged)",
                ),
                (false, false) => (Action::Conflict, "both upstream and local modified"),
            }
        }

        (Some(_), None, None) => (Action::Apply, "new file from upstream"),

        (None, Some(b), Some(l)) if l == b => {
            (Action::Delete, "upstream deleted, local unchanged")
        }
        (None, Some(_), Some(_)) => (Action::Conflict, "upstream deleted but local modified"),
        (None, Some(_), None) => (Action::Delete, "upstream deleted, local already deleted"),

        (None, None, Some(_)) => (Action::PreserveLocal, "user-created file"),

        (Some(u), Some(b), None) if u == b => {
            (Action::Keep, "local deleted, upstream unchanged")
        }
        (Some(_), Some(_), None) => (Action::Conflict, "local deleted but upstream modified"),

        // Baseline missing a file both sides have: only reachable when the
        // baseline is stale or was never seeded.
        (Some(u), None, Some(l)) if u == l => {
            (Action::Keep, "upstream and local added identical file")
        }
        (Some(_), None, Some(_)) => (
            Action::Conflict,
            "added in both upstream and local with different content",
        ),

        (None, None, None) => (Action::Keep, "no action needed"),
    }
}
