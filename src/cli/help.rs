//! Command-name contract for logging spans.

use crate::cli::parse::Commands;

/// Stable command name (e.g. "plan", "apply").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Plan { .. } => "plan",
        Commands::Apply { .. } => "apply",
        Commands::Status { .. } => "status",
        Commands::Install { .. } => "install",
        Commands::Recover => "recover",
        Commands::Config => "config",
    }
}
