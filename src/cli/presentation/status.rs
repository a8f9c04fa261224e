//! Status presentation.

use super::shared::{format_section_heading, to_json};
use crate::diff::TreeChange;
use crate::status::SyncStatus;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn change_lines(out: &mut String, changes: &[TreeChange], empty: &str) {
    if changes.is_empty() {
        out.push_str(&format!("  {}\n\n", empty.green()));
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["", "Path"]);
    for change in changes {
        table.add_row(vec![change.kind.symbol().to_string(), change.path.clone()]);
    }
    out.push_str(&format!("{}\n\n", table));
}

pub fn format_status_text(status: &SyncStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        format_section_heading("Upstream vs Baseline (changes since last sync)")
    ));
    change_lines(&mut out, &status.upstream_changes, "No changes");

    out.push_str(&format!(
        "{}\n",
        format_section_heading("Baseline vs Local (your modifications)")
    ));
    change_lines(&mut out, &status.local_changes, "No modifications");

    if !status.pending_backups.is_empty() {
        out.push_str(&format!("{}\n", format_section_heading("Pending backups")));
        for backup in &status.pending_backups {
            out.push_str(&format!("  {}\n", backup.display().yellow()));
        }
        out.push_str("  An earlier update did not finish; see 'trimerge recover'.\n\n");
    }
    if !status.stale_temps.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format_section_heading("Leftover temporary directories")
        ));
        for temp in &status.stale_temps {
            out.push_str(&format!("  {}\n", temp.display()));
        }
    }
    out.trim_end().to_string()
}

pub fn format_status_json(status: &SyncStatus) -> String {
    to_json(status)
}
