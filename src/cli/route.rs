//! CLI route: single route table and run context. Dispatches to schemas and renderers.

use crate::config::{ConfigLoader, SlotdeckConfig};
use crate::error::AppError;
use crate::quota::QuotaTable;
use crate::render::{OutlineFormat, OutlineRenderer};
use crate::schedule::{RunRequest, ScheduleMode};
use crate::schema::slide_schema;
use crate::seed::SeedStrategy;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::cli::parse::Commands;

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: SlotdeckConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, AppError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    /// Context over an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: SlotdeckConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &SlotdeckConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, AppError> {
        let started = Instant::now();
        let result = match command {
            Commands::Assemble {
                topic,
                slides,
                presenter,
                schema,
                parallel,
                seed,
                seeds,
                format,
            } => self.handle_assemble(
                topic,
                *slides,
                presenter.as_deref(),
                schema,
                *parallel,
                *seed,
                seeds,
                format,
            ),
            Commands::Schemas { format } => self.handle_schemas(format),
        };
        info!(
            workspace = %self.workspace_root.display(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_assemble(
        &self,
        topic: &str,
        slides: usize,
        presenter: Option<&str>,
        schema_name: &str,
        parallel: bool,
        seed: Option<u64>,
        seeds: &[String],
        format: &str,
    ) -> Result<String, AppError> {
        let format = OutlineFormat::parse(format)?;
        let resolved = self.config.schema(schema_name)?;

        let mut schedule = self.config.schedule.clone();
        if let Some(seed) = seed {
            schedule.rng_seed = Some(seed);
        }
        let seed_strategy = if seeds.is_empty() {
            resolved.seeds
        } else {
            SeedStrategy::Cycle {
                seeds: seeds.to_vec(),
            }
        };
        let schema = slide_schema(resolved.name, resolved.quotas, seed_strategy, schedule)?;

        let mut request = RunRequest::new(topic, slides).mode(if parallel {
            ScheduleMode::Parallel
        } else {
            ScheduleMode::Serial
        });
        if let Some(presenter) = presenter {
            request = request.presenter(presenter);
        }

        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            AppError::ConfigError(format!("Failed to start async runtime: {}", e))
        })?;
        let outcome = runtime.block_on(schema.assemble(&request))?;

        let rendered = schema.render(&outcome.deck, &OutlineRenderer::new(format))?;
        let summary = &outcome.summary;
        match format {
            OutlineFormat::Json => {
                let mut value: serde_json::Value = serde_json::from_str(&rendered)?;
                value["schema"] = json!(schema.name());
                value["summary"] = serde_json::to_value(summary)?;
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutlineFormat::Text => {
                let rounds = if summary.rounds.is_empty() {
                    String::new()
                } else {
                    format!(", {} rounds", summary.rounds.len())
                };
                Ok(format!(
                    "{}\n{} slides from schema '{}' (seed {}{}, {} rejected attempts)",
                    rendered,
                    summary.total_slots,
                    schema.name(),
                    summary.base_seed,
                    rounds,
                    summary.generator_failures + summary.validation_rejections
                ))
            }
        }
    }

    fn handle_schemas(&self, format: &str) -> Result<String, AppError> {
        let format = OutlineFormat::parse(format)?;
        let mut schemas = Vec::new();
        for name in self.config.schema_names() {
            schemas.push(self.config.schema(&name)?);
        }

        match format {
            OutlineFormat::Json => {
                let entries: Vec<serde_json::Value> = schemas
                    .iter()
                    .map(|schema| {
                        json!({
                            "name": schema.name,
                            "seeds": schema.seeds,
                            "max_allowed_tags": schema.quotas,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutlineFormat::Text => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["Schema", "Seeds", "Tag limits"]);
                for schema in &schemas {
                    table.add_row(vec![
                        schema.name.clone(),
                        describe_seeds(&schema.seeds),
                        describe_quotas(&schema.quotas),
                    ]);
                }
                Ok(table.to_string())
            }
        }
    }
}

fn describe_seeds(seeds: &SeedStrategy) -> String {
    match seeds {
        SeedStrategy::Identity => "topic".to_string(),
        SeedStrategy::Cycle { seeds } => format!("cycle: {}", seeds.join(", ")),
    }
}

fn describe_quotas(quotas: &QuotaTable) -> String {
    if quotas.is_empty() {
        return "none".to_string();
    }
    quotas
        .iter()
        .map(|(tag, limit)| format!("{}={}", tag, limit))
        .collect::<Vec<_>>()
        .join(", ")
}
