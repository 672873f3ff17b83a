//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, workspace
//! config files and `SLOTDECK__*` environment overrides. Schemas named in the
//! config are merged over the built-in schemas of the same name.

use crate::error::AppError;
use crate::logging::LoggingConfig;
use crate::quota::QuotaTable;
use crate::schedule::ScheduleConfig;
use crate::schema::{builtin_parts, BUILTIN_SCHEMAS};
use crate::seed::SeedStrategy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotdeckConfig {
    /// Scheduler tuning shared by every schema
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Schema definitions and overrides, keyed by schema name
    #[serde(default)]
    pub schemas: HashMap<String, SchemaConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One schema entry in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Built-in schema to start from; defaults to the built-in of the same name
    #[serde(default)]
    pub extends: Option<String>,

    /// Tag limits layered over the base schema's limits, tag by tag
    #[serde(default)]
    pub max_allowed_tags: QuotaTable,

    /// Replaces the base schema's seed strategy when set
    #[serde(default)]
    pub seeds: Option<SeedStrategy>,
}

/// Quotas and seeds after merging config over the built-ins.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    pub name: String,
    pub quotas: QuotaTable,
    pub seeds: SeedStrategy,
}

impl SlotdeckConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.schedule.validate() {
            errors.push(format!("Schedule: {}", e));
        }

        for (name, schema) in &self.schemas {
            if let Some(base) = &schema.extends {
                if builtin_parts(base).is_none() {
                    errors.push(format!(
                        "Schema '{}': extends unknown schema '{}'",
                        name, base
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Resolve a schema by name: base built-in first, then configured overrides.
    pub fn schema(&self, name: &str) -> Result<ResolvedSchema, AppError> {
        let configured = self.schemas.get(name);
        let base_name = configured
            .and_then(|schema| schema.extends.as_deref())
            .unwrap_or(name);

        let (mut quotas, mut seeds) = match (builtin_parts(base_name), configured) {
            (Some(parts), _) => parts,
            (None, Some(schema)) if schema.extends.is_none() => {
                (QuotaTable::new(), SeedStrategy::default())
            }
            (None, _) => return Err(AppError::UnknownSchema(base_name.to_string())),
        };

        if let Some(schema) = configured {
            for (tag, limit) in schema.max_allowed_tags.iter() {
                quotas.set_limit(tag.clone(), *limit);
            }
            if let Some(strategy) = &schema.seeds {
                seeds = strategy.clone();
            }
        }

        Ok(ResolvedSchema {
            name: name.to_string(),
            quotas,
            seeds,
        })
    }

    /// Built-in and configured schema names, sorted.
    pub fn schema_names(&self) -> Vec<String> {
        let names: BTreeSet<String> = BUILTIN_SCHEMAS
            .iter()
            .map(|name| name.to_string())
            .chain(self.schemas.keys().cloned())
            .collect();
        names.into_iter().collect()
    }
}
