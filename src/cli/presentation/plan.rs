//! Plan and apply presentation: text tables and json.

use super::shared::{action_cell, format_section_heading, to_json};
use crate::merge::ApplyReport;
use crate::types::{ChangeEntry, Plan};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

fn changes_table(changes: &[ChangeEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Path", "Reason"]);
    for change in changes {
        table.add_row(vec![
            change.change.symbol().to_string(),
            change.path.clone(),
            change.reason.clone(),
        ]);
    }
    table.to_string()
}

pub fn format_plan_text(plan: &Plan) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", format_section_heading("Upstream changes")));
    if plan.upstream_changes.is_empty() {
        out.push_str("  No changes\n\n");
    } else {
        out.push_str(&format!("{}\n\n", changes_table(&plan.upstream_changes)));
    }

    out.push_str(&format!("{}\n", format_section_heading("Local changes")));
    if plan.local_changes.is_empty() {
        out.push_str("  No modifications\n\n");
    } else {
        out.push_str(&format!("{}\n\n", changes_table(&plan.local_changes)));
    }

    out.push_str(&format!("{}\n", format_section_heading("Merge plan")));
    if plan.merge.is_empty() {
        out.push_str(&format!("  {}", "No changes needed".green()));
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Action", "Path", "Reason"]);
    for entry in &plan.merge {
        table.add_row(vec![
            action_cell(entry.action),
            entry.path.clone(),
            entry.reason.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!(
        "\n{} change(s), {} conflict(s)",
        plan.merge.len(),
        plan.conflicts().count()
    ));
    out
}

pub fn format_plan_json(plan: &Plan) -> String {
    to_json(plan)
}

pub fn format_apply_report_text(report: &ApplyReport) -> String {
    if report == &ApplyReport::noop() {
        return format!("{}", "No changes to apply".green());
    }
    let mut out = format!(
        "{}\n  Applied: {}\n  Deleted: {}\n  Preserved: {}\n  Conflicts: {}\n",
        format_section_heading("Update applied"),
        report.applied,
        report.deleted,
        report.preserved,
        report.conflicts.len()
    );

    if report.has_conflicts() {
        out.push_str(&format!(
            "\n{}\n",
            format_section_heading("Conflicts need manual resolution")
        ));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Path", "Reason", "Artifacts"]);
        for conflict in &report.conflicts {
            table.add_row(vec![
                conflict.path.clone(),
                conflict.reason.clone(),
                conflict.artifacts.join("\n"),
            ]);
        }
        out.push_str(&format!("{}\n", table));
        out.push_str("See each <path>.README for resolution steps.\n");
    }

    if !report.baseline_refreshed {
        out.push_str(&format!(
            "\n{}\n",
            "Baseline was not refreshed; the next run may report spurious conflicts.".yellow()
        ));
    }
    for warning in &report.warnings {
        out.push_str(&format!("{} {}\n", "warning:".yellow(), warning));
    }
    out.trim_end().to_string()
}

pub fn format_apply_json(plan: &Plan, report: &ApplyReport) -> String {
    to_json(&json!({ "plan": plan, "report": report }))
}

pub fn format_dry_run_text(plan: &Plan) -> String {
    let mut out = format_plan_text(plan);
    if !plan.is_empty() {
        out.push_str(&format!(
            "\n\nDry run: run without --dry-run to apply {} change(s)",
            plan.merge.len()
        ));
    }
    out
}
