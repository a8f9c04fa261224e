//! CLI parse: clap types for trimerge. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// trimerge CLI - reconcile template updates with local customizations
#[derive(Parser)]
#[command(name = "trimerge")]
#[command(about = "3-way merge of an upstream template tree into a customized local tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upstream tree (overrides paths.upstream)
    #[arg(long)]
    pub upstream: Option<PathBuf>,

    /// Baseline tree (overrides paths.baseline)
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    /// Local tree (overrides paths.local)
    #[arg(long)]
    pub local: Option<PathBuf>,

    /// Hashing worker threads (overrides hashing.jobs)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the merge plan without changing anything
    Plan {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Build the plan and apply it to the local tree
    Apply {
        /// Show planned changes without applying them
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Show upstream and local changes relative to the baseline
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Seed baseline and local from upstream
    Install {
        /// Re-seed an existing baseline (local is never overwritten)
        #[arg(long)]
        force: bool,
    },
    /// Restore the local tree from its newest backup
    Recover,
    /// Print the effective configuration as TOML
    Config,
}
