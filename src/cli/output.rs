//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApplyError, SyncError};

/// Map domain errors to a string for CLI output. A double fault also points
/// at `trimerge recover`.
pub fn map_error(e: &SyncError) -> String {
    match e {
        SyncError::Apply(apply @ ApplyError::DoubleFault { .. }) => match apply.recovery_dir() {
            Some(dir) => format!(
                "{}\n\nYour previous tree is preserved in {}.\n\
                 Run 'trimerge recover' to restore it.",
                apply,
                dir.display()
            ),
            None => apply.to_string(),
        },
        other => other.to_string(),
    }
}
