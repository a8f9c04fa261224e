//! Merge rules: built-in defaults, lowest precedence.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("paths.upstream", super::DEFAULT_UPSTREAM)?
        .set_default("paths.baseline", super::DEFAULT_BASELINE)?
        .set_default("paths.local", super::DEFAULT_LOCAL)?
        .set_default("walker.follow_symlinks", false)?
        .set_default("apply.lock", true)
}
