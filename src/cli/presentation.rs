//! CLI presentation: text and json formatters per command.

mod plan;
mod shared;
mod status;

pub use plan::{
    format_apply_json, format_apply_report_text, format_dry_run_text, format_plan_json,
    format_plan_text,
};
pub use shared::{format_install_result, format_recover_result};
pub use status::{format_status_json, format_status_text};
