//! Workspace lifecycle through `SyncContext`: install, status, apply, recover

use super::test_utils::{read, snapshot, write};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trimerge::config::TrimergeConfig;
use trimerge::error::{InstallError, RecoveryError};
use trimerge::merge::activate::backup_path;
use trimerge::types::ChangeKind;
use trimerge::{Action, SyncContext, SyncError};

fn context(root: &Path) -> SyncContext {
    SyncContext::new(root, TrimergeConfig::default())
}

fn seed_upstream(root: &Path) {
    write(&root.join("upstream"), "settings.json", "{\"v\":1}");
    write(&root.join("upstream"), "commands/a.md", "a1");
}

#[test]
fn test_full_lifecycle() {
    let dir = TempDir::new().unwrap();
    seed_upstream(dir.path());
    let ctx = context(dir.path());

    let installed = ctx.install(false).unwrap();
    assert_eq!(installed.baseline_files, 2);
    assert_eq!(installed.local_files, Some(2));
    assert!(ctx.status().unwrap().is_clean());

    let paths = ctx.paths().clone();
    write(&paths.upstream, "commands/a.md", "a2");
    write(&paths.local, "settings.json", "{\"v\":1,\"mine\":true}");

    let status = ctx.status().unwrap();
    assert_eq!(status.upstream_changes.len(), 1);
    assert_eq!(status.upstream_changes[0].path, "commands/a.md");
    assert_eq!(status.upstream_changes[0].kind, ChangeKind::Modified);
    assert_eq!(status.local_changes.len(), 1);
    assert_eq!(status.local_changes[0].path, "settings.json");

    let (plan, report) = ctx.apply().unwrap();
    assert_eq!(plan.action_for("commands/a.md"), Action::Apply);
    assert_eq!(plan.action_for("settings.json"), Action::PreserveLocal);
    assert!(report.baseline_refreshed);
    assert_eq!(read(&paths.local, "commands/a.md"), "a2");
    assert_eq!(read(&paths.local, "settings.json"), "{\"v\":1,\"mine\":true}");

    let after = ctx.status().unwrap();
    assert!(after.upstream_changes.is_empty());
    assert_eq!(after.local_changes.len(), 1);
    assert!(after.pending_backups.is_empty());
    assert!(after.stale_temps.is_empty());
}

#[test]
fn test_install_twice_requires_force() {
    let dir = TempDir::new().unwrap();
    seed_upstream(dir.path());
    let ctx = context(dir.path());
    ctx.install(false).unwrap();

    let err = ctx.install(false).unwrap_err();
    assert!(matches!(
        err,
        SyncError::Install(InstallError::AlreadyInstalled(_))
    ));

    let paths = ctx.paths().clone();
    write(&paths.local, "settings.json", "custom");
    write(&paths.upstream, "extra.md", "x");

    let forced = ctx.install(true).unwrap();
    assert_eq!(forced.baseline_files, 3);
    assert!(forced.local_preserved());
    assert_eq!(read(&paths.local, "settings.json"), "custom");
    assert_eq!(read(&paths.baseline, "extra.md"), "x");
}

#[test]
fn test_plan_before_install_is_rejected() {
    let dir = TempDir::new().unwrap();
    seed_upstream(dir.path());
    let ctx = context(dir.path());

    let err = ctx.plan().unwrap_err();
    assert!(matches!(
        err,
        SyncError::Install(InstallError::NotInstalled(_))
    ));
    assert!(err.to_string().contains("install"));
}

#[test]
fn test_status_reports_pending_backup_and_recover_restores_it() {
    let dir = TempDir::new().unwrap();
    seed_upstream(dir.path());
    let ctx = context(dir.path());
    ctx.install(false).unwrap();
    let paths = ctx.paths().clone();
    write(&paths.local, "mine.txt", "m");
    let before = snapshot(&paths.local);

    let backup = backup_path(&paths.local, 42);
    fs::rename(&paths.local, &backup).unwrap();
    fs::create_dir_all(&paths.local).unwrap();
    assert_eq!(ctx.status().unwrap().pending_backups, vec![backup.clone()]);

    // Local must be moved aside before a backup can be restored.
    let err = ctx.recover().unwrap_err();
    assert!(matches!(
        err,
        SyncError::Recovery(RecoveryError::LocalExists(_))
    ));

    fs::remove_dir(&paths.local).unwrap();
    assert_eq!(ctx.recover().unwrap(), backup);
    assert_eq!(snapshot(&paths.local), before);

    let err = ctx.recover().unwrap_err();
    assert!(matches!(err, SyncError::Recovery(RecoveryError::LocalExists(_))));
}

#[test]
fn test_recover_without_backup() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path());

    let err = ctx.recover().unwrap_err();
    assert!(matches!(err, SyncError::Recovery(RecoveryError::NoBackup(_))));
}
