//! Shared presentation helpers plus install and recover formatters.

use crate::install::InstallReport;
use crate::types::Action;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Colored action label for tables.
pub fn action_cell(action: Action) -> String {
    match action {
        Action::Apply => action.as_str().green().to_string(),
        Action::Delete => action.as_str().red().to_string(),
        Action::Conflict => action.as_str().yellow().bold().to_string(),
        Action::PreserveLocal | Action::Keep => action.as_str().dimmed().to_string(),
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_install_result(report: &InstallReport, baseline: &Path, local: &Path) -> String {
    let mut out = format!(
        "{}\n  Baseline: {} ({} files)\n",
        format_section_heading("Installed"),
        baseline.display(),
        report.baseline_files
    );
    match report.local_files {
        Some(count) => out.push_str(&format!("  Local: {} ({} files)", local.display(), count)),
        None => out.push_str(&format!(
            "  Local: {} (already present, left untouched)",
            local.display()
        )),
    }
    out
}

pub fn format_recover_result(backup: &Path, local: &Path) -> String {
    format!(
        "Restored {} from {}",
        local.display(),
        backup.display()
    )
}
