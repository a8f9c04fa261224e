//! CLI route: single route table and run context. Dispatches to the sync
//! context and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::{
    format_apply_json, format_apply_report_text, format_dry_run_text, format_install_result,
    format_plan_json, format_plan_text, format_recover_result, format_status_json,
    format_status_text,
};
use crate::config::{ConfigLoader, TrimergeConfig};
use crate::error::SyncError;
use crate::sync::SyncContext;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span};

/// Runtime context for CLI execution: resolved configuration and workspace.
pub struct RunContext {
    sync: SyncContext,
}

impl RunContext {
    /// Load configuration and fold in the CLI path and hashing overrides.
    pub fn new(cli: &Cli) -> Result<Self, SyncError> {
        let mut config = load_config(cli.workspace.clone(), cli.config.clone())?;
        apply_overrides(&mut config, cli);
        config.validate()?;
        Ok(Self {
            sync: SyncContext::new(cli.workspace.clone(), config),
        })
    }

    pub fn sync(&self) -> &SyncContext {
        &self.sync
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let name = command_name(command);
        let _span = info_span!("command", command = name).entered();
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis(),
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Plan { format } => {
                let plan = self.sync.plan()?;
                Ok(match format.as_str() {
                    "json" => format_plan_json(&plan),
                    _ => format_plan_text(&plan),
                })
            }
            Commands::Apply { dry_run, format } => {
                if *dry_run {
                    let plan = self.sync.plan()?;
                    return Ok(match format.as_str() {
                        "json" => format_plan_json(&plan),
                        _ => format_dry_run_text(&plan),
                    });
                }
                let (plan, report) = self.sync.apply()?;
                Ok(match format.as_str() {
                    "json" => format_apply_json(&plan, &report),
                    _ => format_apply_report_text(&report),
                })
            }
            Commands::Status { format } => {
                let status = self.sync.status()?;
                Ok(match format.as_str() {
                    "json" => format_status_json(&status),
                    _ => format_status_text(&status),
                })
            }
            Commands::Install { force } => {
                let report = self.sync.install(*force)?;
                let paths = self.sync.paths();
                Ok(format_install_result(&report, &paths.baseline, &paths.local))
            }
            Commands::Recover => {
                let backup = self.sync.recover()?;
                Ok(format_recover_result(&backup, &self.sync.paths().local))
            }
            Commands::Config => Ok(self.sync.config().to_toml()?),
        }
    }
}

/// Load config from an explicit file or from the workspace layers.
pub fn load_config(
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<TrimergeConfig, SyncError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(&path)?,
        None => ConfigLoader::load(&workspace_root)?,
    };
    Ok(config)
}

fn apply_overrides(config: &mut TrimergeConfig, cli: &Cli) {
    if let Some(ref upstream) = cli.upstream {
        config.paths.upstream = upstream.clone();
    }
    if let Some(ref baseline) = cli.baseline {
        config.paths.baseline = baseline.clone();
    }
    if let Some(ref local) = cli.local {
        config.paths.local = local.clone();
    }
    if cli.jobs.is_some() {
        config.hashing.jobs = cli.jobs;
    }
}
