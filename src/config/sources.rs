//! Configuration sources, in increasing precedence: global file, workspace
//! file, environment.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Environment overrides: `TRIMERGE_<SECTION>__<KEY>`, e.g. `TRIMERGE_HASHING__JOBS=4`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TRIMERGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
