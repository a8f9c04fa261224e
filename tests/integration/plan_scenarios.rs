//! Plan builder scenarios over real directories

use super::test_utils::{memory_tree, write, TestWorkspace};
use trimerge::error::PlanError;
use trimerge::types::{ChangeKind, TreeSide};
use trimerge::{build_plan, Action, PlanBuilder};

#[test]
fn test_three_file_scenario() {
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

    let plan = build_plan(&ws.upstream_tree(), &ws.baseline_tree(), &ws.local_tree()).unwrap();

    assert_eq!(plan.action_for("a.txt"), Action::Apply);
    assert_eq!(plan.action_for("b.txt"), Action::PreserveLocal);
    assert_eq!(plan.action_for("c.txt"), Action::Conflict);
    assert_eq!(plan.merge.len(), 3);

    let upstream_paths: Vec<_> = plan.upstream_changes.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(upstream_paths, vec!["a.txt", "c.txt"]);
    let local_paths: Vec<_> = plan.local_changes.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(local_paths, vec!["b.txt", "c.txt"]);
}

#[test]
fn test_unchanged_workspace_has_empty_merge() {
    let ws = TestWorkspace::new();
    ws.write_all("settings.json", "{}");
    ws.write_all("commands/a.md", "a");

    let plan = build_plan(&ws.upstream_tree(), &ws.baseline_tree(), &ws.local_tree()).unwrap();

    assert!(plan.is_empty());
    assert!(plan.upstream_changes.is_empty());
    assert!(plan.local_changes.is_empty());
}

#[test]
fn test_deletion_cases() {
    let ws = TestWorkspace::new();
    // upstream deleted, local untouched
    write(&ws.baseline, "gone.txt", "g");
    write(&ws.local, "gone.txt", "g");
    // upstream deleted, local modified
    write(&ws.baseline, "edited.txt", "e");
    write(&ws.local, "edited.txt", "e-custom");
    // local deleted, upstream modified
    write(&ws.upstream, "wanted.txt", "w2");
    write(&ws.baseline, "wanted.txt", "w1");
    // deleted on both sides
    write(&ws.baseline, "both.txt", "b");

    let plan = build_plan(&ws.upstream_tree(), &ws.baseline_tree(), &ws.local_tree()).unwrap();

    assert_eq!(plan.action_for("gone.txt"), Action::Delete);
    assert_eq!(plan.action_for("edited.txt"), Action::Conflict);
    assert_eq!(plan.action_for("wanted.txt"), Action::Conflict);
    assert_eq!(plan.action_for("both.txt"), Action::Delete);
    assert!(plan.entry("both.txt").is_some());

    let both_upstream = plan
        .upstream_changes
        .iter()
        .find(|c| c.path == "both.txt")
        .unwrap();
    assert_eq!(both_upstream.change, ChangeKind::Deleted);
}

#[test]
fn test_additions() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "new-upstream.txt", "n");
    write(&ws.local, "new-local.txt", "l");
    write(&ws.upstream, "same.txt", "s");
    write(&ws.local, "same.txt", "s");
    write(&ws.upstream, "diff.txt", "u");
    write(&ws.local, "diff.txt", "l");

    let plan = build_plan(&ws.upstream_tree(), &ws.baseline_tree(), &ws.local_tree()).unwrap();

    assert_eq!(plan.action_for("new-upstream.txt"), Action::Apply);
    assert_eq!(plan.action_for("new-local.txt"), Action::PreserveLocal);
    assert_eq!(plan.action_for("same.txt"), Action::Keep);
    assert_eq!(plan.action_for("diff.txt"), Action::Conflict);
}

#[test]
fn test_memory_upstream_against_directories() {
    let ws = TestWorkspace::new();
    write(&ws.baseline, "a.txt", "a1");
    write(&ws.local, "a.txt", "a1");
    let bundle = memory_tree(&[("a.txt", "a2")]);

    let plan = build_plan(&bundle, &ws.baseline_tree(), &ws.local_tree()).unwrap();

    assert_eq!(plan.action_for("a.txt"), Action::Apply);
}

#[test]
fn test_plan_is_deterministic_across_pool_sizes() {
    let ws = TestWorkspace::new();
    for i in 0..40 {
        write(&ws.upstream, &format!("dir{}/f{}.txt", i % 4, i), &format!("u{}", i % 3));
        write(&ws.baseline, &format!("dir{}/f{}.txt", i % 4, i), "b");
        write(&ws.local, &format!("dir{}/f{}.txt", i % 4, i), &format!("l{}", i % 2));
    }

    let (u, b, l) = (ws.upstream_tree(), ws.baseline_tree(), ws.local_tree());
    let single = PlanBuilder::new(&u, &b, &l).with_jobs(Some(1)).build().unwrap();
    let many = PlanBuilder::new(&u, &b, &l).with_jobs(Some(8)).build().unwrap();
    let default = build_plan(&u, &b, &l).unwrap();

    assert_eq!(single, many);
    assert_eq!(single, default);
}

#[test]
fn test_missing_local_fails_before_planning() {
    let ws = TestWorkspace::new();
    write(&ws.upstream, "a.txt", "a");
    std::fs::remove_dir_all(&ws.local).unwrap();

    let err = build_plan(&ws.upstream_tree(), &ws.baseline_tree(), &ws.local_tree()).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Collect {
            side: TreeSide::Local,
            ..
        }
    ));
}
