//! Config loading facade: builds the layered source stack and deserializes it.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::SlotdeckConfig;
use crate::error::AppError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, config/config.toml,
    /// config/{SLOTDECK_ENV}.toml, SLOTDECK__* environment variables.
    pub fn load(workspace_root: &Path) -> Result<SlotdeckConfig, AppError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: SlotdeckConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            schemas = config.schemas.len(),
            "Configuration loaded"
        );
        Self::validated(config)
    }

    /// Load configuration from one explicit file, still honoring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<SlotdeckConfig, AppError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);

        let config: SlotdeckConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn validated(config: SlotdeckConfig) -> Result<SlotdeckConfig, AppError> {
        config.validate().map_err(|errors| {
            AppError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            ))
        })?;
        Ok(config)
    }
}
