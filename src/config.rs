//! Configuration System
//!
//! Layered configuration loaded with the `config` crate. Precedence, lowest
//! first: built-in defaults, global file, `<workspace>/trimerge.toml`,
//! `TRIMERGE_<SECTION>__<KEY>` environment variables. CLI flags are applied on
//! top by the binary.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::merge::ApplyOptions;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

mod facade;
mod merge_policy;
pub mod sources;

pub use facade::ConfigLoader;

pub const DEFAULT_UPSTREAM: &str = "upstream";
pub const DEFAULT_BASELINE: &str = ".trimerge/baseline";
pub const DEFAULT_LOCAL: &str = "local";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrimergeConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub walker: WalkerConfig,

    #[serde(default)]
    pub apply: ApplyOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree locations, relative to the workspace root unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_upstream")]
    pub upstream: PathBuf,
    #[serde(default = "default_baseline")]
    pub baseline: PathBuf,
    #[serde(default = "default_local")]
    pub local: PathBuf,
}

fn default_upstream() -> PathBuf {
    PathBuf::from(DEFAULT_UPSTREAM)
}

fn default_baseline() -> PathBuf {
    PathBuf::from(DEFAULT_BASELINE)
}

fn default_local() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL)
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            baseline: default_baseline(),
            local: default_local(),
        }
    }
}

/// Absolute tree locations for one workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub upstream: PathBuf,
    pub baseline: PathBuf,
    pub local: PathBuf,
}

impl PathsConfig {
    /// Join relative entries onto `workspace_root`.
    pub fn resolve(&self, workspace_root: &Path) -> ResolvedPaths {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                workspace_root.join(p)
            }
        };
        ResolvedPaths {
            upstream: resolve(&self.upstream),
            baseline: resolve(&self.baseline),
            local: resolve(&self.local),
        }
    }
}

impl ResolvedPaths {
    /// Describe every pair of trees where one is, or lies inside, the other.
    ///
    /// Comparison is lexical. Pairs mixing absolute and relative paths cannot
    /// be compared this way and are skipped.
    pub fn overlaps(&self) -> Vec<String> {
        let named = [
            ("paths.upstream", lexical(&self.upstream)),
            ("paths.baseline", lexical(&self.baseline)),
            ("paths.local", lexical(&self.local)),
        ];
        let mut problems = Vec::new();
        for (i, (a_name, a)) in named.iter().enumerate() {
            for (b_name, b) in &named[i + 1..] {
                if a.as_os_str().is_empty()
                    || b.as_os_str().is_empty()
                    || a.is_absolute() != b.is_absolute()
                {
                    continue;
                }
                if a == b {
                    problems.push(format!("{} and {} must differ", a_name, b_name));
                } else if b.starts_with(a) {
                    problems.push(format!("{} must not contain {}", a_name, b_name));
                } else if a.starts_with(b) {
                    problems.push(format!("{} must not contain {}", b_name, a_name));
                }
            }
        }
        problems
    }
}

/// Drop `.` segments and fold `..` without touching the filesystem.
fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Hashing pool settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Worker threads for hashing; unset uses one per core
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl TrimergeConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        for (name, path) in [
            ("paths.upstream", &self.paths.upstream),
            ("paths.baseline", &self.paths.baseline),
            ("paths.local", &self.paths.local),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(format!("{} cannot be empty", name));
            }
        }
        errors.extend(self.paths.resolve(Path::new("")).overlaps());
        if self.hashing.jobs == Some(0) {
            errors.push("hashing.jobs must be at least 1".to_string());
        }
        if let Err(e) = self.logging.validate() {
            errors.push(format!("logging: {}", e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("; ")))
        }
    }

    /// Render as TOML, e.g. for `trimerge config`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
