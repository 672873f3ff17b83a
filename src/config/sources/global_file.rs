//! Global config file source: $XDG_CONFIG_HOME/slotdeck/config.toml (platform config dir elsewhere)

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use directories::BaseDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("slotdeck").join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            builder = builder.add_source(File::from(global_path.as_path()).required(false));
        } else {
            debug!(
                config_path = %global_path.display(),
                "No global configuration file; using built-in defaults"
            );
        }
    }
    Ok(builder)
}
