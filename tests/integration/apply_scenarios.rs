//! End-to-end apply scenarios: plan, apply, and re-plan

use super::test_utils::{memory_tree, read, snapshot, write, TestWorkspace};
use std::fs;
use trimerge::merge::{ApplyOptions, PlanApplier};
use trimerge::{apply_plan, build_plan, sync, Action, Plan};

fn plan_for(ws: &TestWorkspace) -> Plan {
    build_plan(&ws.upstream_tree(), &ws.baseline_tree(), &ws.local_tree()).unwrap()
}

#[test]
fn test_three_file_scenario_applies() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "a.txt", "a2");
    write(&ws.baseline, "a.txt", "a1");
    write(&ws.local, "a.txt", "a1");
    write(&ws.upstream, "b.txt", "b1");
    write(&ws.baseline, "b.txt", "b1");
    write(&ws.local, "b.txt", "b1-custom");
    write(&ws.upstream, "c.txt", "c2");
    write(&ws.baseline, "c.txt", "c1");
    write(&ws.local, "c.txt", "c1-custom");

    let plan = plan_for(&ws);
    let report = apply_plan(&plan, &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.preserved, 1);
    assert_eq!(report.conflicts.len(), 1);
    assert!(report.baseline_refreshed);

    assert_eq!(read(&ws.local, "a.txt"), "a2");
    assert_eq!(read(&ws.local, "b.txt"), "b1-custom");
    assert_eq!(read(&ws.local, "c.txt"), "c1-custom");
    assert_eq!(read(&ws.local, "c.txt.upstream"), "c2");
    assert_eq!(read(&ws.local, "c.txt.conflict"), "c1-custom");
    assert!(read(&ws.local, "c.txt.README").contains("c.txt"));

    // Baseline mirrors upstream exactly.
    assert_eq!(snapshot(&ws.baseline), snapshot(&ws.upstream));
    assert!(ws.leftovers().is_empty());
}

#[test]
fn test_apply_makes_local_match_upstream() {
    let ws = TestWorkspace::new();
    write(&ws.baseline, "x/y.md", "1");
    write(&ws.local, "x/y.md", "1");
    write(&ws.upstream, "x/y.md", "2");

    apply_plan(&plan_for(&ws), &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert_eq!(
        fs::read(ws.local.join("x/y.md")).unwrap(),
        fs::read(ws.upstream.join("x/y.md")).unwrap()
    );
}

#[test]
fn test_second_run_is_empty_after_conflict_free_apply() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "a.txt", "a2");
    write(&ws.baseline, "a.txt", "a1");
    write(&ws.local, "a.txt", "a1");
    write(&ws.upstream, "new.txt", "n");
    write(&ws.baseline, "old.txt", "o");
    write(&ws.local, "old.txt", "o");
    write(&ws.local, "mine.txt", "m");

    let first = plan_for(&ws);
    assert_eq!(first.count(Action::Conflict), 0);
    apply_plan(&first, &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    let second = plan_for(&ws);
    // Only the user's own file remains as a preserve.
    assert!(second
        .merge
        .iter()
        .all(|e| e.action == Action::PreserveLocal && e.path == "mine.txt"));

    let before = snapshot(&ws.local);
    apply_plan(&second, &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();
    assert_eq!(snapshot(&ws.local), before);
}

#[test]
fn test_upstream_deletion_removes_local_file() {
    let ws = TestWorkspace::new();
    write(&ws.baseline, "retired.md", "r");
    write(&ws.local, "retired.md", "r");
    ws.write_all("kept.md", "k");

    let plan = plan_for(&ws);
    assert_eq!(plan.action_for("retired.md"), Action::Delete);
    let report = apply_plan(&plan, &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert_eq!(report.deleted, 1);
    assert!(!ws.local.join("retired.md").exists());
    assert!(!ws.baseline.join("retired.md").exists());
    assert_eq!(read(&ws.local, "kept.md"), "k");
}

#[test]
fn test_new_upstream_file_is_created_with_parents() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "agents/deep/new.md", "fresh");

    apply_plan(&plan_for(&ws), &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert_eq!(read(&ws.local, "agents/deep/new.md"), "fresh");
    assert_eq!(read(&ws.baseline, "agents/deep/new.md"), "fresh");
}

#[test]
fn test_conflict_leaves_local_untouched_with_exactly_three_artifacts() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "settings.json", "{\"v\":2}");
    write(&ws.baseline, "settings.json", "{\"v\":1}");
    write(&ws.local, "settings.json", "{\"v\":1,\"mine\":true}");
    let before: Vec<_> = snapshot(&ws.local).into_iter().map(|(p, _)| p).collect();

    let report =
        apply_plan(&plan_for(&ws), &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert_eq!(read(&ws.local, "settings.json"), "{\"v\":1,\"mine\":true}");
    let after: Vec<_> = snapshot(&ws.local).into_iter().map(|(p, _)| p).collect();
    let added: Vec<_> = after.iter().filter(|p| !before.contains(p)).collect();
    assert_eq!(
        added,
        vec![
            "settings.json.README",
            "settings.json.conflict",
            "settings.json.upstream"
        ]
    );
    assert_eq!(
        report.conflicts[0].artifacts,
        vec![
            "settings.json.upstream",
            "settings.json.conflict",
            "settings.json.README"
        ]
    );
}

#[test]
fn test_local_deletion_conflict_has_no_conflict_file() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "rule.md", "r2");
    write(&ws.baseline, "rule.md", "r1");

    let report =
        apply_plan(&plan_for(&ws), &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert!(!ws.local.join("rule.md").exists());
    assert!(!ws.local.join("rule.md.conflict").exists());
    assert_eq!(read(&ws.local, "rule.md.upstream"), "r2");
    assert_eq!(report.conflicts[0].artifacts.len(), 2);
}

#[test]
fn test_empty_plan_touches_nothing() {
    let ws = TestWorkspace::new();
    ws.write_all("a.txt", "same");
    // Differs from upstream, but a refresh only happens after an apply.
    write(&ws.upstream, "b.txt", "b");
    write(&ws.local, "b.txt", "b");

    let plan = plan_for(&ws);
    assert!(plan.is_empty());
    let report = apply_plan(&plan, &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert!(!report.baseline_refreshed);
    assert_eq!(report.total_applied(), 0);
    assert!(!ws.baseline.join("b.txt").exists());
    assert!(ws.leftovers().is_empty());
}

#[test]
fn test_baseline_refresh_failure_is_only_a_warning() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "a.txt", "a2");
    write(&ws.baseline, "a.txt", "a1");
    write(&ws.local, "a.txt", "a1");
    let plan = plan_for(&ws);

    // A regular file where the baseline directory should be created.
    fs::remove_dir_all(&ws.baseline).unwrap();
    let blocker = ws.root().join("blocker");
    fs::write(&blocker, "not a dir").unwrap();
    let baseline_under_file = blocker.join("baseline");

    let report = PlanApplier::new(&ws.upstream_tree(), &baseline_under_file, &ws.local)
        .apply(&plan)
        .unwrap();

    assert_eq!(read(&ws.local, "a.txt"), "a2");
    assert!(!report.baseline_refreshed);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_sync_with_compiled_in_bundle() {
    let ws = TestWorkspace::new();
    write(&ws.baseline, "a.txt", "a1");
    write(&ws.local, "a.txt", "a1");
    let bundle = memory_tree(&[("a.txt", "a2"), ("b.txt", "b")]);

    let (plan, report) = sync(
        &bundle,
        &ws.baseline,
        &ws.local,
        ApplyOptions { lock: false },
    )
    .unwrap();

    assert_eq!(plan.merge.len(), 2);
    assert_eq!(report.applied, 2);
    assert_eq!(read(&ws.local, "b.txt"), "b");
    assert_eq!(read(&ws.baseline, "a.txt"), "a2");
}

#[cfg(unix)]
#[test]
fn test_applied_file_replaces_local_symlink_not_its_target() {
    let ws = TestWorkspace::new();
    let outside = ws.root().join("outside.txt");
    fs::write(&outside, "theirs").unwrap();
    std::os::unix::fs::symlink(&outside, ws.local.join("shared.txt")).unwrap();
    write(&ws.upstream, "shared.txt", "upstream");

    apply_plan(&plan_for(&ws), &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap();

    assert_eq!(fs::read_to_string(&outside).unwrap(), "theirs");
    let meta = fs::symlink_metadata(ws.local.join("shared.txt")).unwrap();
    assert!(meta.file_type().is_file());
    assert_eq!(read(&ws.local, "shared.txt"), "upstream");
}

#[test]
fn test_local_directory_blocking_upstream_file_fails_safely() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "hooks", "upstream hooks file");
    write(&ws.local, "hooks/mine.sh", "echo mine");
    let before = snapshot(&ws.local);

    let plan = plan_for(&ws);
    assert_eq!(plan.action_for("hooks"), Action::Apply);
    assert_eq!(plan.action_for("hooks/mine.sh"), Action::PreserveLocal);

    let err = apply_plan(&plan, &ws.upstream_tree(), &ws.baseline, &ws.local).unwrap_err();

    assert!(matches!(err, trimerge::ApplyError::ApplyFile { .. }));
    assert_eq!(snapshot(&ws.local), before);
    assert!(ws.leftovers().is_empty());
}
