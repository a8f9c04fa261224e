//! Config loading entry points.

use super::merge_policy;
use super::sources::{self, global_file, workspace_file};
use super::TrimergeConfig;
use crate::error::ConfigError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Loads `TrimergeConfig` from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace: defaults, global file, workspace
    /// file, then environment.
    pub fn load(workspace_root: &Path) -> Result<TrimergeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder);
        let builder = workspace_file::add_to_builder(builder, workspace_root);
        let builder = sources::add_environment(builder);

        let config: TrimergeConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        config.validate()?;
        Ok(config)
    }

    /// Load from one explicit file. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<TrimergeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = sources::add_environment(builder);

        let config: TrimergeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults only; no files, no environment.
    pub fn defaults() -> Result<TrimergeConfig, ConfigError> {
        let config: TrimergeConfig = merge_policy::builder_with_defaults()?
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string layered over defaults.
    pub fn from_toml_str(text: &str) -> Result<TrimergeConfig, ConfigError> {
        let config: TrimergeConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
