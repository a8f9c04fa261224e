//! CLI domain: parse, route, help, output, and presentation only.
//! No merge logic; the route table dispatches to `SyncContext`.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::{load_config, RunContext};
